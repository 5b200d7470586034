use std::collections::{BTreeMap, HashSet};

use crate::domain::browse::GenreCount;

/// Normaliza un único tag: sin espacios alrededor y en minúsculas.
fn normalize_tag(tag: &str) -> String {
  tag.trim().to_lowercase()
}

/// Convierte la lista de géneros separada por comas en un conjunto.
///
/// Los tags vacíos se descartan, así que `""` y `" , "` producen el conjunto
/// vacío. El resultado no depende del orden ni de los duplicados de la entrada.
pub fn tag_set(raw: &str) -> HashSet<String> {
  raw.split(',').map(normalize_tag).filter(|t| !t.is_empty()).collect()
}

/// Primer tag no vacío de la lista, normalizado.
pub fn primary_genre(raw: &str) -> Option<String> {
  raw.split(',').map(normalize_tag).find(|t| !t.is_empty())
}

/// Cuenta cuántos artistas llevan cada género.
///
/// Un artista con el mismo género repetido cuenta una sola vez. El resultado
/// va ordenado por número de artistas (desc) y luego por nombre.
pub fn tally<'a, I>(genre_lists: I) -> Vec<GenreCount>
where
  I: IntoIterator<Item = &'a str>,
{
  let mut counts: BTreeMap<String, u64> = BTreeMap::new();

  for raw in genre_lists {
    for tag in tag_set(raw) {
      *counts.entry(tag).or_default() += 1;
    }
  }

  let mut tallied: Vec<GenreCount> =
    counts.into_iter().map(|(genre, artists)| GenreCount { genre, artists }).collect();
  tallied.sort_by(|a, b| b.artists.cmp(&a.artists).then_with(|| a.genre.cmp(&b.genre)));
  tallied
}
