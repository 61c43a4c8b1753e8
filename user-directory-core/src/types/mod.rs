//! 类型定义模块

mod user;

pub use user::{User, UserDocument, UserFormData};
