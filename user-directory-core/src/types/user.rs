//! 用户记录相关类型定义

use serde::{Deserialize, Serialize};

/// 用户记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// 用户 ID (UUID)，创建后不可变
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    /// 邮箱（大小写不敏感唯一）
    pub email: String,
}

impl User {
    /// Assemble a record from an id and a full field set.
    #[must_use]
    pub fn from_form(id: String, form: UserFormData) -> Self {
        Self {
            id,
            first_name: form.first_name,
            last_name: form.last_name,
            phone: form.phone,
            email: form.email,
        }
    }

    /// Case-insensitive email comparison.
    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }
}

/// 创建 / 更新请求：除 id 以外的完整字段集
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFormData {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
}

/// 持久化文档：`{ "users": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDocument {
    pub users: Vec<User>,
}

impl UserDocument {
    pub fn position_by_id(&self, id: &str) -> Option<usize> {
        self.users.iter().position(|u| u.id == id)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users.iter().find(|u| u.has_email(email))
    }
}
