pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unknown plugin: {name}")]
    UnknownPlugin { name: String },

    #[error("Duplicate plugin registration: {name}")]
    DuplicatePlugin { name: String },
}
