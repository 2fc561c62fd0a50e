use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("unrecognized field name `{0}`")]
    UnknownFieldName(String),
    #[error("solve response carries neither `error` nor `{0}`")]
    MissingSolutionField(&'static str),
}
