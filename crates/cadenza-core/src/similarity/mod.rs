//! Motor de similitud entre artistas.
//!
//! Las primitivas de puntuación ([`scoring`], [`levenshtein`]) son funciones
//! puras compartidas por las dos estrategias de selección de candidatos
//! ([`strategy`]). La orquestación de una consulta completa vive en
//! [`crate::services::SimilarityService`].

pub mod levenshtein;
pub mod picker;
pub mod scoring;
pub mod strategy;

pub use picker::{IndexPicker, ReferencePicker, StoreRandomPicker};
pub use scoring::{composite_score, genre_similarity, name_similarity, EditDistance};
pub use strategy::{CandidateSelector, Exhaustive, Pruned, ScoredCandidate, Selection, StrategyKind};
