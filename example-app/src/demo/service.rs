//! 示例业务组件

use component_macros::{interface, service};
use mvc_common::Autowired;
use parking_lot::Mutex;
use serde::Serialize;

/// 用户信息
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

/// 用户服务接口
#[interface]
pub trait UserService {
    fn list(&self) -> Vec<User>;
    fn find(&self, id: u64) -> Option<User>;
}

/// 审计日志接口
#[interface]
pub trait AuditLog {
    fn record(&self, event: &str);
    fn events(&self) -> Vec<String>;
}

/// 内存用户服务
#[service(implements(UserService), constructor = "InMemoryUserService::seeded")]
pub struct InMemoryUserService {
    users: Vec<User>,
    #[autowired("auditLog")]
    audit: Autowired<dyn AuditLog>,
}

impl InMemoryUserService {
    fn seeded() -> Result<Self, std::convert::Infallible> {
        let users = ["alice", "bob", "carol"]
            .iter()
            .zip(1u64..)
            .map(|(name, id)| User {
                id,
                name: name.to_string(),
            })
            .collect();
        Ok(Self {
            users,
            audit: Autowired::new(),
        })
    }

    fn note(&self, event: String) {
        if let Some(audit) = self.audit.get() {
            audit.record(&event);
        }
    }
}

impl UserService for InMemoryUserService {
    fn list(&self) -> Vec<User> {
        self.note("list".to_string());
        self.users.clone()
    }

    fn find(&self, id: u64) -> Option<User> {
        self.note(format!("find {}", id));
        self.users.iter().find(|user| user.id == id).cloned()
    }
}

/// 内存审计日志
#[service("auditLog", implements(AuditLog))]
#[derive(Default)]
pub struct MemoryAuditLog {
    events: Mutex<Vec<String>>,
}

impl AuditLog for MemoryAuditLog {
    fn record(&self, event: &str) {
        self.events.lock().push(event.to_string());
    }

    fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }
}
