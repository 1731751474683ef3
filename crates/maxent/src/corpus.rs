//! Decoding of labeled training documents into integer-encoded form.
//!
//! The JSON input is an array of objects. Every key except `__label__` names
//! a class and maps to the feature names firing for that (document, class)
//! pair; `__label__` names the gold class. The first document fixes the class
//! set and its key order fixes the class indices. Feature indices are handed
//! out in order of first occurrence.
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::CorpusError;

/// Key holding the gold class of a document.
pub const LABEL_KEY: &str = "__label__";

/// One training document: a feature list per class plus the gold class.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    features: Vec<Vec<usize>>,
    class: usize,
}

impl Document {
    /// Features firing for `class`. Repeated indices count multiple times.
    pub fn features(&self, class: usize) -> &[usize] {
        &self.features[class]
    }

    pub fn num_classes(&self) -> usize {
        self.features.len()
    }

    /// Gold class index.
    pub fn class(&self) -> usize {
        self.class
    }
}

/// A validated, integer-encoded corpus.
#[derive(Debug, Clone)]
pub struct Corpus {
    docs: Vec<Document>,
    feature_map: Vec<String>,
    class_map: Vec<String>,
}

impl Corpus {
    pub fn from_json_str(json: &str) -> Result<Self, CorpusError> {
        let raw: Vec<Map<String, Value>> = serde_json::from_str(json)?;
        Self::from_json_documents(raw)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CorpusError> {
        let raw: Vec<Map<String, Value>> = serde_json::from_reader(reader)?;
        Self::from_json_documents(raw)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CorpusError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    fn from_json_documents(raw: Vec<Map<String, Value>>) -> Result<Self, CorpusError> {
        let mut builder = CorpusBuilder::new();
        for (doc, object) in raw.iter().enumerate() {
            let label = match object.get(LABEL_KEY) {
                None => return Err(CorpusError::MissingLabel { doc }),
                Some(Value::String(label)) => label.as_str(),
                Some(_) => return Err(CorpusError::LabelNotString { doc }),
            };

            let mut classes = Vec::with_capacity(object.len().saturating_sub(1));
            for (class, value) in object.iter().filter(|(k, _)| k.as_str() != LABEL_KEY) {
                let list = value.as_array().ok_or_else(|| CorpusError::FeaturesNotArray {
                    doc,
                    class: class.clone(),
                })?;
                let names = list
                    .iter()
                    .map(|v| {
                        v.as_str().ok_or_else(|| CorpusError::FeatureNotString {
                            doc,
                            class: class.clone(),
                        })
                    })
                    .collect::<Result<Vec<&str>, _>>()?;
                classes.push((class.as_str(), names));
            }

            builder.add_document(&classes, label)?;
        }
        builder.build()
    }

    pub fn docs(&self) -> &[Document] {
        &self.docs
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }

    pub fn num_classes(&self) -> usize {
        self.class_map.len()
    }

    pub fn num_features(&self) -> usize {
        self.feature_map.len()
    }

    /// Feature index → name.
    pub fn feature_map(&self) -> &[String] {
        &self.feature_map
    }

    /// Class index → name.
    pub fn class_map(&self) -> &[String] {
        &self.class_map
    }

    pub(crate) fn into_parts(self) -> (Vec<Document>, Vec<String>, Vec<String>) {
        (self.docs, self.feature_map, self.class_map)
    }
}

/// Incrementally encodes documents given by class and feature names.
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    class_map: Vec<String>,
    class_index: HashMap<String, usize>,
    feature_map: Vec<String>,
    feature_index: HashMap<String, usize>,
    docs: Vec<Document>,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document given as `(class name, feature names)` pairs and its gold
    /// class name. The first document defines the class set; later documents
    /// must name exactly the same classes, in any order.
    ///
    /// A rejected document leaves the builder unchanged.
    pub fn add_document<C, F>(&mut self, classes: &[(C, Vec<F>)], label: &str) -> Result<(), CorpusError>
    where
        C: AsRef<str>,
        F: AsRef<str>,
    {
        let doc = self.docs.len();
        let (slots, class) = if doc == 0 {
            let mut index: HashMap<&str, usize> = HashMap::with_capacity(classes.len());
            for (slot, (class, _)) in classes.iter().enumerate() {
                if index.insert(class.as_ref(), slot).is_some() {
                    return Err(CorpusError::ClassSetMismatch { doc });
                }
            }
            ((0..classes.len()).collect::<Vec<_>>(), index.get(label).copied())
        } else {
            let slots = self.resolve_classes(doc, classes)?;
            (slots, self.class_index.get(label).copied())
        };
        let class = class.ok_or_else(|| CorpusError::UnknownLabel {
            doc,
            label: label.to_string(),
        })?;

        // Validated; only now touch the interning tables.
        if doc == 0 {
            for (slot, (name, _)) in classes.iter().enumerate() {
                self.class_index.insert(name.as_ref().to_string(), slot);
                self.class_map.push(name.as_ref().to_string());
            }
        }
        let mut features = vec![Vec::new(); classes.len()];
        for (&slot, (_, names)) in slots.iter().zip(classes) {
            features[slot] = names.iter().map(|name| self.intern_feature(name.as_ref())).collect();
        }

        self.docs.push(Document { features, class });
        Ok(())
    }

    /// Map the class keys of a later document onto the class indices fixed by
    /// the first one.
    fn resolve_classes<C, F>(&self, doc: usize, classes: &[(C, Vec<F>)]) -> Result<Vec<usize>, CorpusError>
    where
        C: AsRef<str>,
    {
        if classes.len() != self.class_map.len() {
            return Err(CorpusError::ClassSetMismatch { doc });
        }
        let mut seen = vec![false; self.class_map.len()];
        let mut slots = Vec::with_capacity(classes.len());
        for (class, _) in classes {
            let slot = *self
                .class_index
                .get(class.as_ref())
                .ok_or(CorpusError::ClassSetMismatch { doc })?;
            if std::mem::replace(&mut seen[slot], true) {
                return Err(CorpusError::ClassSetMismatch { doc });
            }
            slots.push(slot);
        }
        Ok(slots)
    }

    fn intern_feature(&mut self, name: &str) -> usize {
        if let Some(&index) = self.feature_index.get(name) {
            return index;
        }
        let index = self.feature_map.len();
        self.feature_index.insert(name.to_string(), index);
        self.feature_map.push(name.to_string());
        index
    }

    pub fn build(self) -> Result<Corpus, CorpusError> {
        if self.docs.is_empty() {
            return Err(CorpusError::Empty);
        }
        log::info!(
            "Loaded corpus: {} documents, {} classes, {} features",
            self.docs.len(),
            self.class_map.len(),
            self.feature_map.len()
        );
        Ok(Corpus {
            docs: self.docs,
            feature_map: self.feature_map,
            class_map: self.class_map,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_WAY: &str = r#"[
        {"A": ["a"], "B": ["b"], "__label__": "A"},
        {"A": ["b"], "B": ["a"], "__label__": "B"}
    ]"#;

    #[test]
    fn indices_follow_first_occurrence() {
        let corpus = Corpus::from_json_str(TWO_WAY).unwrap();
        assert_eq!(corpus.class_map(), &["A".to_string(), "B".to_string()]);
        assert_eq!(corpus.feature_map(), &["a".to_string(), "b".to_string()]);
        assert_eq!(corpus.docs()[0].features(0), &[0]);
        assert_eq!(corpus.docs()[0].features(1), &[1]);
        assert_eq!(corpus.docs()[1].features(0), &[1]);
        assert_eq!(corpus.docs()[1].class(), 1);
    }

    #[test]
    fn class_order_comes_from_first_document() {
        let json = r#"[
            {"__label__": "z", "z": ["f"], "y": []},
            {"y": ["g", "g"], "z": [], "__label__": "y"}
        ]"#;
        let corpus = Corpus::from_json_str(json).unwrap();
        assert_eq!(corpus.class_map(), &["z".to_string(), "y".to_string()]);
        let second = &corpus.docs()[1];
        assert_eq!(second.class(), 1);
        assert_eq!(second.features(1), &[1, 1]);
        assert!(second.features(0).is_empty());
    }

    #[test]
    fn empty_corpus_rejected() {
        assert!(matches!(Corpus::from_json_str("[]"), Err(CorpusError::Empty)));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            Corpus::from_json_str("{\"A\": []}"),
            Err(CorpusError::Parse(_))
        ));
        assert!(matches!(Corpus::from_json_str("[{"), Err(CorpusError::Parse(_))));
    }

    #[test]
    fn structural_errors_name_the_document() {
        let missing = r#"[{"A": ["a"]}]"#;
        assert!(matches!(
            Corpus::from_json_str(missing),
            Err(CorpusError::MissingLabel { doc: 0 })
        ));

        let unknown = r#"[{"A": ["a"], "__label__": "A"}, {"A": ["a"], "__label__": "B"}]"#;
        assert!(matches!(
            Corpus::from_json_str(unknown),
            Err(CorpusError::UnknownLabel { doc: 1, .. })
        ));

        let mismatch = r#"[{"A": [], "B": [], "__label__": "A"}, {"A": [], "C": [], "__label__": "A"}]"#;
        assert!(matches!(
            Corpus::from_json_str(mismatch),
            Err(CorpusError::ClassSetMismatch { doc: 1 })
        ));

        let short = r#"[{"A": [], "B": [], "__label__": "A"}, {"A": [], "__label__": "A"}]"#;
        assert!(matches!(
            Corpus::from_json_str(short),
            Err(CorpusError::ClassSetMismatch { doc: 1 })
        ));

        let not_array = r#"[{"A": "a", "__label__": "A"}]"#;
        assert!(matches!(
            Corpus::from_json_str(not_array),
            Err(CorpusError::FeaturesNotArray { doc: 0, .. })
        ));

        let not_string = r#"[{"A": [1], "__label__": "A"}]"#;
        assert!(matches!(
            Corpus::from_json_str(not_string),
            Err(CorpusError::FeatureNotString { doc: 0, .. })
        ));

        let label_type = r#"[{"A": [], "__label__": 3}]"#;
        assert!(matches!(
            Corpus::from_json_str(label_type),
            Err(CorpusError::LabelNotString { doc: 0 })
        ));
    }

    #[test]
    fn builder_accepts_owned_and_borrowed_names() {
        let mut builder = CorpusBuilder::new();
        builder
            .add_document(&[("pos", vec!["good"]), ("neg", vec!["bad"])], "pos")
            .unwrap();
        builder
            .add_document(
                &[
                    ("neg".to_string(), vec!["good".to_string()]),
                    ("pos".to_string(), vec!["great".to_string()]),
                ],
                "neg",
            )
            .unwrap();
        let corpus = builder.build().unwrap();
        assert_eq!(corpus.num_docs(), 2);
        assert_eq!(corpus.num_features(), 3);
        assert_eq!(corpus.docs()[1].features(0), &[2]);
        assert_eq!(corpus.docs()[1].features(1), &[0]);
    }

    #[test]
    fn rejected_document_leaves_no_features_behind() {
        let mut builder = CorpusBuilder::new();
        builder
            .add_document(&[("A", vec!["a"]), ("B", vec!["b"])], "A")
            .unwrap();

        let unknown_class = builder.add_document(&[("A", vec!["ghost"]), ("C", vec!["x"])], "A");
        assert!(matches!(unknown_class, Err(CorpusError::ClassSetMismatch { doc: 1 })));
        let unknown_label = builder.add_document(&[("A", vec!["ghost"]), ("B", vec!["x"])], "Z");
        assert!(matches!(unknown_label, Err(CorpusError::UnknownLabel { doc: 1, .. })));
        let duplicate = builder.add_document(&[("A", vec!["ghost"]), ("A", vec!["x"])], "A");
        assert!(matches!(duplicate, Err(CorpusError::ClassSetMismatch { doc: 1 })));

        builder
            .add_document(&[("B", vec!["c"]), ("A", vec!["a"])], "B")
            .unwrap();
        let corpus = builder.build().unwrap();
        assert_eq!(corpus.num_docs(), 2);
        assert_eq!(
            corpus.feature_map(),
            &["a".to_string(), "b".to_string(), "c".to_string()]
        );
        assert_eq!(corpus.docs()[1].features(1), &[2]);
        assert_eq!(corpus.docs()[1].class(), 1);
    }

    #[test]
    fn first_document_can_be_retried_after_rejection() {
        let mut builder = CorpusBuilder::new();
        let unknown_label = builder.add_document(&[("A", vec!["a"]), ("B", vec!["b"])], "Z");
        assert!(matches!(unknown_label, Err(CorpusError::UnknownLabel { doc: 0, .. })));
        let duplicate = builder.add_document(&[("A", vec!["a"]), ("A", vec!["b"])], "A");
        assert!(matches!(duplicate, Err(CorpusError::ClassSetMismatch { doc: 0 })));

        builder
            .add_document(&[("B", vec!["q"]), ("A", vec!["p"])], "A")
            .unwrap();
        let corpus = builder.build().unwrap();
        assert_eq!(corpus.class_map(), &["B".to_string(), "A".to_string()]);
        assert_eq!(corpus.feature_map(), &["q".to_string(), "p".to_string()]);
        assert_eq!(corpus.docs()[0].class(), 1);
    }
}
