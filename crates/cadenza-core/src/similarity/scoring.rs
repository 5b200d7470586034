use crate::domain::genres::tag_set;
use crate::similarity::levenshtein::{levenshtein_matrix, levenshtein_rolling};

/// Peso del género en la puntuación compuesta.
pub const GENRE_WEIGHT: f64 = 0.7;
/// Peso del nombre en la puntuación compuesta.
pub const NAME_WEIGHT: f64 = 0.3;

/// Puntuación cuando un nombre contiene al otro.
const CONTAINMENT_SCORE: f64 = 0.8;
/// Diferencia relativa de longitud a partir de la cual no se calcula la distancia.
const MAX_LENGTH_RATIO_GAP: f64 = 0.5;

/// Núcleo de distancia de edición usado por [`name_similarity_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditDistance {
  /// Matriz completa, usada por la estrategia exhaustiva.
  Matrix,
  /// Dos filas alternadas, usada por la estrategia con poda.
  Rolling,
}

impl EditDistance {
  pub fn distance(self, a: &[char], b: &[char]) -> usize {
    match self {
      EditDistance::Matrix => levenshtein_matrix(a, b),
      EditDistance::Rolling => levenshtein_rolling(a, b),
    }
  }
}

/// Solapamiento entre dos listas de géneros separadas por comas.
///
/// `|A ∩ B| / max(|A|, |B|)` sobre los conjuntos normalizados. Si ambos
/// conjuntos están vacíos el resultado es `0`.
pub fn genre_similarity(a: &str, b: &str) -> f64 {
  let tags_a = tag_set(a);
  let tags_b = tag_set(b);

  let largest = tags_a.len().max(tags_b.len());
  if largest == 0 {
    return 0.0;
  }

  let shared = tags_a.intersection(&tags_b).count();
  shared as f64 / largest as f64
}

/// Similitud entre dos nombres de artista en `[0, 1]`.
pub fn name_similarity(a: &str, b: &str) -> f64 {
  name_similarity_with(a, b, EditDistance::Rolling)
}

/// Similitud de nombres con un núcleo de distancia concreto.
///
/// Se evalúa en orden y se corta en el primer paso que decide:
/// 1. iguales sin distinguir mayúsculas → `1`;
/// 2. uno contiene al otro → `0.8`;
/// 3. longitudes que difieren en más de la mitad de la mayor → `0`;
/// 4. `1 - distancia / longitud_mayor`.
///
/// Las longitudes se cuentan en `char`.
pub fn name_similarity_with(a: &str, b: &str, kernel: EditDistance) -> f64 {
  let a = a.to_lowercase();
  let b = b.to_lowercase();

  if a == b {
    return 1.0;
  }

  if a.contains(b.as_str()) || b.contains(a.as_str()) {
    return CONTAINMENT_SCORE;
  }

  let a: Vec<char> = a.chars().collect();
  let b: Vec<char> = b.chars().collect();
  let longest = a.len().max(b.len());
  let length_gap = a.len().abs_diff(b.len());

  if length_gap as f64 > MAX_LENGTH_RATIO_GAP * longest as f64 {
    return 0.0;
  }

  // longest > 0: dos cadenas vacías ya salieron por el paso 1.
  1.0 - kernel.distance(&a, &b) as f64 / longest as f64
}

/// Puntuación compuesta `0.7 · género + 0.3 · nombre`.
pub fn composite_score(genre_score: f64, name_score: f64) -> f64 {
  GENRE_WEIGHT * genre_score + NAME_WEIGHT * name_score
}
