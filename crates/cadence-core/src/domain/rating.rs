use serde::{Deserialize, Serialize};
use std::fmt;

/// Valoración personal de un favorito en una escala de 0.0 a 5.0.
///
/// Internamente se guarda como un entero (`u32`) en formato *fixed-point*
/// con 4 decimales de precisión:
///
/// - `0.0`  → `0`
/// - `3.5`  → `35000`
/// - `5.0`  → `50000`
///
/// En el documento se serializa como ese entero, así dos clientes que
/// escriben la misma nota producen exactamente el mismo valor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Rating(u32);

impl Rating {
  const SCALE_FACTOR: u32 = 10_000;
  const MAX_VALUE: u32 = 5 * Self::SCALE_FACTOR;

  /// Crea una `Rating` a partir de un valor en coma flotante.
  ///
  /// Devuelve `None` si el valor está fuera de `[0.0, 5.0]`.
  pub fn new(value: f32) -> Option<Self> {
    if !(0.0..=5.0).contains(&value) {
      return None;
    }

    let scaled_value = (value * Self::SCALE_FACTOR as f32).round() as u32;

    if scaled_value > Self::MAX_VALUE {
      return None;
    }

    Some(Self(scaled_value))
  }

  pub fn as_f32(&self) -> f32 {
    self.0 as f32 / Self::SCALE_FACTOR as f32
  }
}

impl TryFrom<u32> for Rating {
  type Error = String;

  fn try_from(raw: u32) -> Result<Self, Self::Error> {
    if raw > Self::MAX_VALUE {
      return Err(format!("rating {raw} exceeds {}", Self::MAX_VALUE));
    }
    Ok(Self(raw))
  }
}

impl From<Rating> for u32 {
  fn from(rating: Rating) -> Self {
    rating.0
  }
}

impl fmt::Display for Rating {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // `floor`: solo 5.0 llega a ★★★★★.
    let full_stars = self.as_f32().floor() as usize;
    let empty_stars = 5 - full_stars;

    for _ in 0..full_stars {
      write!(f, "★")?;
    }
    for _ in 0..empty_stars {
      write!(f, "☆")?;
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn rejects_out_of_range_values() {
    assert!(Rating::new(-0.1).is_none());
    assert!(Rating::new(5.01).is_none());
    assert!(Rating::try_from(50_001).is_err());
  }

  #[test]
  fn renders_stars_with_floor() {
    assert_eq!(Rating::new(4.9).unwrap().to_string(), "★★★★☆");
    assert_eq!(Rating::new(5.0).unwrap().to_string(), "★★★★★");
    assert_eq!(Rating::new(0.0).unwrap().to_string(), "☆☆☆☆☆");
  }

  #[test]
  fn serializes_as_fixed_point_integer() {
    let rating = Rating::new(3.5).unwrap();
    assert_eq!(serde_json::to_value(rating).unwrap(), serde_json::json!(35000));
  }
}
