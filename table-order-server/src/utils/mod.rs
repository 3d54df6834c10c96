//! 工具模块 - 日志、输入校验、时区换算

pub mod logger;
pub mod time;
pub mod validation;
