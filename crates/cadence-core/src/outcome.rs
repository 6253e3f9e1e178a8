use crate::errors::WorkflowError;

/// Resultado etiquetado que recibe quien invoca un flujo.
///
/// Nunca transporta errores crudos del almacén: el fallo ya viene
/// clasificado y con un mensaje listo para mostrar.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
  Success { message: String, payload: Option<T> },
  Failure(WorkflowError),
}

impl<T> Outcome<T> {
  pub fn success(message: impl Into<String>, payload: T) -> Self {
    Outcome::Success { message: message.into(), payload: Some(payload) }
  }

  /// Éxito sin identidad nueva que devolver.
  pub fn done(message: impl Into<String>) -> Self {
    Outcome::Success { message: message.into(), payload: None }
  }

  pub fn failure(error: WorkflowError) -> Self {
    Outcome::Failure(error)
  }

  pub fn is_success(&self) -> bool {
    matches!(self, Outcome::Success { .. })
  }

  pub fn message(&self) -> String {
    match self {
      Outcome::Success { message, .. } => message.clone(),
      Outcome::Failure(err) => err.to_string(),
    }
  }

  pub fn payload(&self) -> Option<&T> {
    match self {
      Outcome::Success { payload, .. } => payload.as_ref(),
      Outcome::Failure(_) => None,
    }
  }

  pub fn into_payload(self) -> Option<T> {
    match self {
      Outcome::Success { payload, .. } => payload,
      Outcome::Failure(_) => None,
    }
  }

  pub fn error(&self) -> Option<&WorkflowError> {
    match self {
      Outcome::Success { .. } => None,
      Outcome::Failure(err) => Some(err),
    }
  }

  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
    match self {
      Outcome::Success { message, payload } => Outcome::Success { message, payload: payload.map(f) },
      Outcome::Failure(err) => Outcome::Failure(err),
    }
  }

  pub fn into_result(self) -> Result<Option<T>, WorkflowError> {
    match self {
      Outcome::Success { payload, .. } => Ok(payload),
      Outcome::Failure(err) => Err(err),
    }
  }
}

impl<T> From<WorkflowError> for Outcome<T> {
  fn from(err: WorkflowError) -> Self {
    Outcome::Failure(err)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::Collection;

  #[test]
  fn failure_message_comes_from_error() {
    let outcome: Outcome<String> =
      WorkflowError::PrimaryWrite { collection: Collection::Favorites, message: "offline".into() }.into();

    assert!(!outcome.is_success());
    assert_eq!(outcome.message(), "Could not save favorite: offline");
    assert!(outcome.payload().is_none());
  }

  #[test]
  fn map_keeps_message() {
    let outcome = Outcome::success("Created", 7).map(|n| n * 2);
    assert_eq!(outcome.message(), "Created");
    assert_eq!(outcome.into_result(), Ok(Some(14)));
  }
}
