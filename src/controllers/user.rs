// Read-only user directory.

use anyhow::{bail, Context};
use serde::Serialize;
use serde_json::json;

use crate::declaration::{
    Controller, ControllerDecl, ControllerType, HttpVerb, OperationDecl, ParamRole, Respondable,
};
use crate::dispatcher::{CallArgs, HandlerResponse};

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

#[derive(Debug)]
pub struct UserController {
    users: Vec<User>,
}

impl Default for UserController {
    fn default() -> Self {
        let users = [("abc-123", "John"), ("def-456", "Jane")]
            .into_iter()
            .map(|(id, name)| User {
                id: id.to_string(),
                name: name.to_string(),
            })
            .collect();
        Self { users }
    }
}

impl UserController {
    /// `user/list` (GET) and `user/get/{id}` (GET).
    #[must_use]
    pub fn declaration() -> ControllerDecl {
        ControllerDecl::new(ControllerType::of::<Self>(), "user")
            .operation(OperationDecl::new("list").at("list").verb(HttpVerb::Get))
            .operation(
                OperationDecl::new("get")
                    .at("get")
                    .verb(HttpVerb::Get)
                    .param(ParamRole::FromUrl),
            )
    }
}

impl Controller for UserController {
    fn invoke(&self, operation: &str, args: CallArgs) -> anyhow::Result<Box<dyn Respondable>> {
        let response = match operation {
            "list" => HandlerResponse::json(200, json!({ "users": self.users })),
            "get" => {
                let id = args.url(0).context("user id not bound")?;
                match self.users.iter().find(|u| u.id == id) {
                    Some(user) => HandlerResponse::json(200, json!(user)),
                    None => HandlerResponse::error(404, "user not found"),
                }
            }
            other => bail!("unknown operation `{other}`"),
        };
        Ok(Box::new(response))
    }
}
