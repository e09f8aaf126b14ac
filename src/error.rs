use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("axis `{axis}` has no layout yet")]
    AxisNotLaidOut { axis: &'static str },

    #[error("unknown scene node: {0}")]
    UnknownNode(u64),

    #[error("render backend failure: {0}")]
    Backend(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("`{operation}` is not allowed while the host is {state}")]
    Lifecycle {
        operation: &'static str,
        state: &'static str,
    },
}
