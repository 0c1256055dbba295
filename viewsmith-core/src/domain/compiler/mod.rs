pub mod quoter;
pub mod view;

pub use quoter::IdentifierQuoter;
pub use view::{ViewBuilder, ViewDefinition};
