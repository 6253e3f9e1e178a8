use thiserror::Error;

use crate::domain::Collection;

/// Por qué falló un flujo del coordinador.
///
/// El `Display` de cada variante es un mensaje apto para mostrar al usuario
/// tal cual; las capas superiores no deberían tener que reinterpretarlo.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
  /// La escritura principal falló: no se creó nada y no hubo compensación.
  #[error("Could not save {collection}: {message}")]
  PrimaryWrite { collection: Collection, message: String },

  /// Falló la actualización de la lista de referencias después de una
  /// escritura principal correcta; la principal ya se revirtió.
  #[error("Could not update {collection}: {message}")]
  SecondaryWrite { collection: Collection, message: String },

  /// No se pudo leer un registro necesario para validar el flujo.
  #[error("Could not load {collection}: {message}")]
  Read { collection: Collection, message: String },

  #[error("{collection} {id} not found")]
  NotFound { collection: Collection, id: String },

  #[error("{collection} {id} does not belong to this user")]
  NotOwner { collection: Collection, id: String },

  #[error("{0}")]
  Invalid(String),
}

impl WorkflowError {
  pub fn collection(&self) -> Option<Collection> {
    match self {
      WorkflowError::PrimaryWrite { collection, .. }
      | WorkflowError::SecondaryWrite { collection, .. }
      | WorkflowError::Read { collection, .. }
      | WorkflowError::NotFound { collection, .. }
      | WorkflowError::NotOwner { collection, .. } => Some(*collection),
      WorkflowError::Invalid(_) => None,
    }
  }

  /// `true` si el flujo llegó a escribir algo y tuvo que compensarlo.
  pub fn was_compensated(&self) -> bool {
    matches!(self, WorkflowError::SecondaryWrite { .. })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn messages_are_displayable() {
    let err = WorkflowError::SecondaryWrite { collection: Collection::Users, message: "quota exceeded".into() };
    assert_eq!(err.to_string(), "Could not update user: quota exceeded");
    assert!(err.was_compensated());

    let err = WorkflowError::NotFound { collection: Collection::Playlists, id: "playlist_1".into() };
    assert_eq!(err.to_string(), "playlist playlist_1 not found");
    assert_eq!(err.collection(), Some(Collection::Playlists));
  }
}
