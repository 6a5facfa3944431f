//! Errors reported by pool, entity and container operations.
//!
//! Every failure is local and synchronous: the operation that fails leaves the pool, its entities
//! and its groups exactly as they were before the call.

use crate::ecs::entity::Entity;

/// Convenience result alias for fallible ECS operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The ways an ECS operation can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A component of this type is already attached to the entity.
    #[error("entity {entity} already has a `{component}` component")]
    DuplicateComponent {
        entity: Entity,
        component: &'static str,
    },

    /// No component of this type is attached to the entity.
    #[error("entity {entity} has no `{component}` component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    /// The entity was never created by this pool, or has already been destroyed.
    #[error("entity {0} is not alive in this pool")]
    UnknownEntity(Entity),

    /// The system container has already run its initialization pass.
    #[error("system container is already initialized")]
    AlreadyInitialized,

    /// The system container was executed before it was initialized.
    #[error("system container must be initialized before it is executed")]
    NotInitialized,

    /// An application system reported a failure of its own.
    #[error("system `{system}` failed: {message}")]
    System {
        system: &'static str,
        message: String,
    },
}

impl Error {
    /// Build an [`Error::System`] for the named system.
    pub fn system(system: &'static str, message: impl Into<String>) -> Self {
        Self::System {
            system,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_entity_and_component() {
        // Given
        let entity = Entity::new(3u32);

        // When
        let duplicate = Error::DuplicateComponent {
            entity,
            component: "Position",
        };
        let unknown = Error::UnknownEntity(entity.genned());

        // Then
        assert_eq!(
            duplicate.to_string(),
            "entity 3:0 already has a `Position` component"
        );
        assert_eq!(unknown.to_string(), "entity 3:1 is not alive in this pool");
    }

    #[test]
    fn system_error_helper() {
        let err = Error::system("Spawner", "out of spawn points");
        assert_eq!(err.to_string(), "system `Spawner` failed: out of spawn points");
    }
}
