//! Field layout shared by a dataset and the tree built from it.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::TreeError;
use crate::node::FeatureIndex;
use crate::value::ValueKind;

/// A named feature column and the kind of value it holds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeatureSpec {
    name: String,
    kind: ValueKind,
}

impl FeatureSpec {
    /// Declare a feature with an explicit kind.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Declare a numeric feature.
    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Numeric)
    }

    /// Declare a categorical feature.
    pub fn categorical(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Categorical)
    }

    /// Return the feature name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the declared value kind.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.kind
    }
}

#[derive(Deserialize)]
struct SchemaSpec {
    class_field: String,
    features: Vec<FeatureSpec>,
}

/// The class field plus the ordered feature fields of a dataset.
///
/// Feature order is significant: the split search visits features in this
/// order, which decides the winner among equal-gain candidates.
///
/// Deserializes from `{"class_field": "...", "features": [{"name": "...", "kind": "numeric"}]}`
/// and is validated on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "SchemaSpec")]
pub struct Schema {
    class_field: String,
    features: Vec<FeatureSpec>,
}

impl Schema {
    /// Create a validated schema.
    ///
    /// # Errors
    ///
    /// | Variant | When |
    /// |---|---|
    /// | [`TreeError::ZeroFeatures`] | `features` is empty |
    /// | [`TreeError::DuplicateFeature`] | a feature name appears twice |
    /// | [`TreeError::ClassFieldIsFeature`] | `class_field` is also listed as a feature |
    pub fn new(
        class_field: impl Into<String>,
        features: Vec<FeatureSpec>,
    ) -> Result<Self, TreeError> {
        let class_field = class_field.into();
        if features.is_empty() {
            return Err(TreeError::ZeroFeatures);
        }
        let mut seen = HashSet::with_capacity(features.len());
        for spec in &features {
            if spec.name == class_field {
                return Err(TreeError::ClassFieldIsFeature { name: class_field });
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(TreeError::DuplicateFeature {
                    name: spec.name.clone(),
                });
            }
        }
        Ok(Self {
            class_field,
            features,
        })
    }

    /// Return the name of the field holding the class label.
    #[must_use]
    pub fn class_field(&self) -> &str {
        &self.class_field
    }

    /// Return the feature fields in search order.
    #[must_use]
    pub fn features(&self) -> &[FeatureSpec] {
        &self.features
    }

    /// Return the number of feature fields.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.features.len()
    }

    /// Return the feature at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` did not come from this schema.
    #[must_use]
    pub fn feature(&self, index: FeatureIndex) -> &FeatureSpec {
        &self.features[index.index()]
    }

    /// Look up a feature's position by name.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<FeatureIndex> {
        self.features
            .iter()
            .position(|spec| spec.name == name)
            .map(FeatureIndex::new)
    }

    /// Look up the declared kind of a feature by name.
    #[must_use]
    pub fn kind_of(&self, name: &str) -> Option<ValueKind> {
        self.features
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.kind)
    }
}

impl TryFrom<SchemaSpec> for Schema {
    type Error = TreeError;

    fn try_from(spec: SchemaSpec) -> Result<Self, Self::Error> {
        Schema::new(spec.class_field, spec.features)
    }
}
