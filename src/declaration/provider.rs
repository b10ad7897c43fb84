use super::types::ControllerDecl;

/// Source of controller declarations.
///
/// The router never discovers controllers on its own; whatever enumerates
/// them (a generated registry, a plugin loader, a hand-written list) hands
/// them over as plain [`ControllerDecl`] values.
pub trait DeclarationProvider {
    fn declarations(&self) -> anyhow::Result<Vec<ControllerDecl>>;
}

impl DeclarationProvider for Vec<ControllerDecl> {
    fn declarations(&self) -> anyhow::Result<Vec<ControllerDecl>> {
        Ok(self.clone())
    }
}

impl DeclarationProvider for [ControllerDecl] {
    fn declarations(&self) -> anyhow::Result<Vec<ControllerDecl>> {
        Ok(self.to_vec())
    }
}

/// Explicit, in-code list of controller declarations.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    controllers: Vec<ControllerDecl>,
}

impl StaticRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, controller: ControllerDecl) -> &mut Self {
        self.controllers.push(controller);
        self
    }

    #[must_use]
    pub fn with(mut self, controller: ControllerDecl) -> Self {
        self.controllers.push(controller);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

impl DeclarationProvider for StaticRegistry {
    fn declarations(&self) -> anyhow::Result<Vec<ControllerDecl>> {
        Ok(self.controllers.clone())
    }
}
