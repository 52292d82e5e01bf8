pub mod messages;
pub mod source;

pub use messages::CheckRequest;
pub use messages::CheckResponse;
pub use messages::InParams;
pub use messages::InRequest;
pub use messages::InResponse;
pub use messages::MetadataField;
pub use messages::OutParams;
pub use messages::OutRequest;
pub use messages::OutResponse;
pub use messages::Version;
pub use messages::number_metadata;
pub use source::DEFAULT_INITIAL_VERSION;
pub use source::DriverKind;
pub use source::SourceConfig;
