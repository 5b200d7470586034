//! Distancia de edición con coste unitario para inserción, borrado y sustitución.
//!
//! Hay dos implementaciones con el mismo resultado exacto: la matriz completa
//! O(m·n) y la variante de dos filas. La segunda solo ahorra memoria.

/// Distancia de Levenshtein con la matriz `(m + 1) × (n + 1)` completa.
pub fn levenshtein_matrix(a: &[char], b: &[char]) -> usize {
  let (m, n) = (a.len(), b.len());
  let mut dp = vec![vec![0usize; n + 1]; m + 1];

  for (i, row) in dp.iter_mut().enumerate() {
    row[0] = i;
  }
  for (j, cell) in dp[0].iter_mut().enumerate() {
    *cell = j;
  }

  for i in 1..=m {
    for j in 1..=n {
      let cost = usize::from(a[i - 1] != b[j - 1]);
      dp[i][j] = (dp[i - 1][j] + 1).min(dp[i][j - 1] + 1).min(dp[i - 1][j - 1] + cost);
    }
  }

  dp[m][n]
}

/// Distancia de Levenshtein guardando solo la fila anterior y la actual.
pub fn levenshtein_rolling(a: &[char], b: &[char]) -> usize {
  // Filas del largo de la cadena más corta.
  if a.len() < b.len() {
    return levenshtein_rolling(b, a);
  }

  let mut prev: Vec<usize> = (0..=b.len()).collect();
  let mut curr = vec![0usize; b.len() + 1];

  for (i, ca) in a.iter().enumerate() {
    curr[0] = i + 1;
    for (j, cb) in b.iter().enumerate() {
      let cost = usize::from(ca != cb);
      curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
    }
    std::mem::swap(&mut prev, &mut curr);
  }

  prev[b.len()]
}
