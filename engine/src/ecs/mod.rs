pub mod component;
pub mod entity;
pub mod error;
pub mod group;
pub mod matcher;
pub mod pool;
pub mod system;
pub(crate) mod util;

pub use component::Component;
pub use entity::Entity;
pub use error::{Error, Result};
pub use group::{Collector, Group, Trigger};
pub use matcher::Matcher;
pub use pool::{Config, Pool};
pub use system::{BindPool, Execute, Initialize, Reactive, Reaction, System, SystemContainer};
