//! 示例控制器

use super::service::{AuditLog, User, UserService};
use anyhow::Context;
use component_macros::{controller, routes};
use mvc_common::{Autowired, Request};
use serde_json::{json, Value};

/// 用户控制器
#[controller]
#[request_mapping("/user")]
#[derive(Default)]
pub struct UserController {
    #[autowired]
    users: Autowired<dyn UserService>,
    #[autowired("auditLog")]
    audit: Autowired<dyn AuditLog>,
}

#[routes]
impl UserController {
    #[request_mapping("/list")]
    fn list(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.users.require("users")?.list())
    }

    #[request_mapping("/detail")]
    fn detail(&self, request: &Request) -> anyhow::Result<Value> {
        let id: u64 = request
            .param("id")
            .context("缺少参数 id")?
            .parse()
            .context("参数 id 必须是整数")?;
        let user = self.users.require("users")?.find(id);
        Ok(match user {
            Some(user) => json!({ "found": true, "user": user }),
            None => json!({ "found": false, "id": id }),
        })
    }

    #[request_mapping("/audit")]
    fn audit(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.audit.require("audit")?.events())
    }
}

/// 健康检查控制器
#[controller]
#[derive(Default)]
pub struct HealthController;

#[routes]
impl HealthController {
    #[request_mapping("/health")]
    fn health(&self) -> Value {
        json!({ "status": "UP" })
    }
}
