// In-memory pet store.

use anyhow::{anyhow, bail, Context};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::RwLock;

use crate::declaration::{
    Controller, ControllerDecl, ControllerType, HttpVerb, OperationDecl, ParamRole, Respondable,
};
use crate::dispatcher::{CallArgs, HandlerResponse};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewPet {
    name: String,
    #[serde(default)]
    tag: Option<String>,
}

#[derive(Debug)]
pub struct PetController {
    pets: RwLock<Vec<Pet>>,
}

impl Default for PetController {
    fn default() -> Self {
        Self {
            pets: RwLock::new(vec![
                Pet {
                    id: 1,
                    name: "Bella".to_string(),
                    tag: Some("dog".to_string()),
                },
                Pet {
                    id: 2,
                    name: "Milo".to_string(),
                    tag: Some("cat".to_string()),
                },
            ]),
        }
    }
}

impl PetController {
    /// Routes under `pet`:
    ///
    /// | verb   | path            | operation |
    /// |--------|-----------------|-----------|
    /// | GET    | `pet?limit=n`   | list      |
    /// | POST   | `pet`           | add       |
    /// | DELETE | `pet/{id}`      | remove    |
    /// | GET    | `pet/find/{id}` | find      |
    #[must_use]
    pub fn declaration() -> ControllerDecl {
        ControllerDecl::new(ControllerType::of::<Self>(), "pet")
            .operation(
                OperationDecl::new("list")
                    .verb(HttpVerb::Get)
                    .param(ParamRole::FromQuery("limit".to_string())),
            )
            .operation(
                OperationDecl::new("add")
                    .verb(HttpVerb::Post)
                    .param(ParamRole::FromBody),
            )
            .operation(
                OperationDecl::new("remove")
                    .verb(HttpVerb::Delete)
                    .param(ParamRole::FromUrl),
            )
            .operation(
                OperationDecl::new("find")
                    .at("find")
                    .verb(HttpVerb::Get)
                    .param(ParamRole::FromUrl),
            )
    }

    fn list(&self, args: &CallArgs) -> anyhow::Result<HandlerResponse> {
        let limit = match args.str(0) {
            Some(raw) => raw.parse::<usize>().context("limit must be a number")?,
            None => usize::MAX,
        };
        let pets = self.pets.read().map_err(|_| anyhow!("pet store poisoned"))?;
        let page: Vec<&Pet> = pets.iter().take(limit).collect();
        Ok(HandlerResponse::json(200, json!({ "pets": page })))
    }

    fn add(&self, args: &CallArgs) -> anyhow::Result<HandlerResponse> {
        let body = args.body().context("pet body not bound")?;
        let new: NewPet = serde_json::from_value(body.clone()).context("invalid pet")?;
        let mut pets = self.pets.write().map_err(|_| anyhow!("pet store poisoned"))?;
        let id = pets.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        let pet = Pet {
            id,
            name: new.name,
            tag: new.tag,
        };
        pets.push(pet.clone());
        Ok(HandlerResponse::json(201, json!(pet)))
    }

    fn find(&self, args: &CallArgs) -> anyhow::Result<HandlerResponse> {
        let id = pet_id(args)?;
        let pets = self.pets.read().map_err(|_| anyhow!("pet store poisoned"))?;
        Ok(match pets.iter().find(|p| p.id == id) {
            Some(pet) => HandlerResponse::json(200, json!(pet)),
            None => HandlerResponse::error(404, "pet not found"),
        })
    }

    fn remove(&self, args: &CallArgs) -> anyhow::Result<HandlerResponse> {
        let id = pet_id(args)?;
        let mut pets = self.pets.write().map_err(|_| anyhow!("pet store poisoned"))?;
        let before = pets.len();
        pets.retain(|p| p.id != id);
        Ok(if pets.len() < before {
            HandlerResponse::json(200, json!({ "deleted": id }))
        } else {
            HandlerResponse::error(404, "pet not found")
        })
    }
}

fn pet_id(args: &CallArgs) -> anyhow::Result<u64> {
    let raw = args.url(0).context("pet id not bound")?;
    raw.parse().with_context(|| format!("invalid pet id `{raw}`"))
}

impl Controller for PetController {
    fn invoke(&self, operation: &str, args: CallArgs) -> anyhow::Result<Box<dyn Respondable>> {
        let response = match operation {
            "list" => self.list(&args)?,
            "add" => self.add(&args)?,
            "find" => self.find(&args)?,
            "remove" => self.remove(&args)?,
            other => bail!("unknown operation `{other}`"),
        };
        Ok(Box::new(response))
    }
}
