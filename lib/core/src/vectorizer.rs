// Fitted TF-IDF vocabulary that defines the feature matrix columns
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    // term -> column
    vocabulary: HashMap<String, u32, ahash::RandomState>,
    // column -> inverse document frequency
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    pub fn new(
        vocabulary: HashMap<String, u32, ahash::RandomState>,
        idf: Vec<f32>,
    ) -> Result<Self> {
        let vectorizer = Self { vocabulary, idf };
        vectorizer.validate()?;
        Ok(vectorizer)
    }

    /// Every term maps to a distinct column that has an idf weight
    pub fn validate(&self) -> Result<()> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(Error::Misaligned {
                artifact: "vectorizer idf",
                unit: "weights",
                expected: self.vocabulary.len(),
                actual: self.idf.len(),
            });
        }
        let mut seen = vec![false; self.idf.len()];
        for (term, &col) in &self.vocabulary {
            match seen.get_mut(col as usize) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(Error::Serialization(format!(
                        "vocabulary column {col} is assigned twice (term {term:?})"
                    )))
                }
                None => {
                    return Err(Error::Serialization(format!(
                        "vocabulary term {term:?} maps to column {col} beyond {} features",
                        self.idf.len()
                    )))
                }
            }
        }
        Ok(())
    }

    /// Number of feature columns the vectorizer produces
    #[inline]
    pub fn n_features(&self) -> usize {
        self.idf.len()
    }

    #[inline]
    pub fn column(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    #[inline]
    pub fn idf(&self, column: u32) -> Option<f32> {
        self.idf.get(column as usize).copied()
    }
}
