use thiserror::Error;

use crate::orchestrator::AssemblyStage;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档传输（远端服务）错误
    #[error("传输错误: {0}")]
    Transport(#[from] TransportError),
    /// 模板锚点注册表错误
    #[error("注册表错误: {0}")]
    Registry(#[from] RegistryError),
    /// 内容绑定错误
    #[error("绑定错误: {0}")]
    Binding(#[from] BindingError),
    /// 装配计划校验错误
    #[error("计划错误: {0}")]
    Plan(#[from] PlanError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
}

/// 传输错误的分类，决定是否重试
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// 限流、暂时不可用，可以退避重试
    Retryable,
    /// 其他所有错误，立即上报
    Fatal,
}

/// 文档传输错误
#[derive(Debug, Clone, Error)]
#[error("{operation} 失败 ({class:?}, status={status:?}): {message}")]
pub struct TransportError {
    /// 失败的操作名（copy_template / duplicate_section / submit_batch / publish）
    pub operation: String,
    pub class: ErrorClass,
    /// HTTP 状态码（如果有）
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn retryable(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            class: ErrorClass::Retryable,
            status: None,
            message: message.into(),
        }
    }

    pub fn fatal(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            class: ErrorClass::Fatal,
            status: None,
            message: message.into(),
        }
    }

    /// 按 HTTP 状态码分类：429 / 5xx 网关类为可重试，其余为致命
    pub fn from_status(operation: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        let class = if matches!(status, 429 | 500 | 502 | 503 | 504) {
            ErrorClass::Retryable
        } else {
            ErrorClass::Fatal
        };
        Self {
            operation: operation.into(),
            class,
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.class == ErrorClass::Retryable
    }

    /// 将错误强制降级为致命（copy_template 的任何失败都不重试）
    pub fn into_fatal(mut self) -> Self {
        self.class = ErrorClass::Fatal;
        self
    }
}

/// 模板锚点注册表错误
#[derive(Debug, Error)]
pub enum RegistryError {
    /// 不在固定集合中的幻灯片类型
    #[error("未知的幻灯片类型: {kind}")]
    UnknownSectionKind { kind: String },
    /// 锚点集中不存在的元素名
    #[error("幻灯片 {section} 中不存在元素 {element}")]
    UnknownElement { section: String, element: String },
}

/// 内容绑定错误
#[derive(Debug, Error)]
pub enum BindingError {
    /// 标识映射中缺少模板元素对应的新 ID
    #[error("实例 {instance} 的标识映射缺少元素 {object_id}")]
    MissingMapping { instance: String, object_id: String },
    /// 复制返回的映射与锚点集不一致
    #[error("幻灯片 {section} 的复制结果缺少 {missing} 个元素映射")]
    IncompleteMapping { section: String, missing: usize },
    /// 把单实例幻灯片的锚点用在了可复制幻灯片上（或反之）
    #[error("幻灯片 {section} 是可复制的，必须通过标识映射解析")]
    RawTemplateTarget { section: String },
    /// 复制实例没有对应的数据条目
    #[error("复制实例 {instance} 没有对应的数据条目")]
    MissingItem { instance: String },
}

/// 装配计划校验错误
#[derive(Debug, Error)]
pub enum PlanError {
    /// 指令目标既不在静态锚点集中，也不在任何标识映射中
    #[error("指令目标 {target} 未经过注册 (元素引用完整性检查失败)")]
    UnresolvedTarget { target: String },
    /// 两个实例的映射共享了同一个目标 ID
    #[error("目标 ID {target} 同时出现在多个复制实例中")]
    SharedDestination { target: String },
    /// 删除模板幻灯片时它的复制尚未全部完成
    #[error("幻灯片 {section} 的复制未完成，不能删除")]
    PrematureDeletion { section: String },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 必填配置缺失
    #[error("缺少必填配置 {var_name}")]
    MissingValue { var_name: String },
    /// 配置文件解析失败
    #[error("配置文件 {path} 解析失败: {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 解析失败
    #[error("JSON解析失败 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// 装配失败：停在哪个阶段、上一个成功的阶段、已复制的文档（保留用于排查）
#[derive(Debug, Error)]
#[error("装配在进入 {failed_stage:?} 阶段时失败 (最后完成阶段: {last_completed:?}): {source}")]
pub struct AssemblyFailure {
    pub failed_stage: AssemblyStage,
    pub last_completed: AssemblyStage,
    /// 模板复制成功后才有值；失败时不删除该文档
    pub document_id: Option<String>,
    #[source]
    pub source: AppError,
}

impl AssemblyFailure {
    /// 是否为提交阶段（结构性）失败
    pub fn is_submission_failure(&self) -> bool {
        matches!(
            self.failed_stage,
            AssemblyStage::Submitted | AssemblyStage::Done
        )
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建 JSON 解析错误
    pub fn json_parse_failed(path: impl Into<String>, source: serde_json::Error) -> Self {
        AppError::File(FileError::JsonParseFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建未知幻灯片类型错误
    pub fn unknown_section_kind(kind: impl Into<String>) -> Self {
        AppError::Registry(RegistryError::UnknownSectionKind { kind: kind.into() })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
