//! The Tensor Algebra Relation schema.
use super::data_type::DataType;
use super::element::{Attribute, DataElement, Dimension};
use super::nominal::TypeDef;
use crate::type_system::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Suffix appended to an element name that is already taken.
const DUPLICATE_NAME_SUFFIX: &str = "-new";

/// Selects what `Tar::clone_schema` carries over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaClone {
    pub dimensions: bool,
    pub attributes: bool,
    /// Copies the nominal type and the bindings whose elements survived.
    pub nominal_type: bool,
}

impl SchemaClone {
    /// Dimensions and attributes, no nominal type.
    pub const STRUCTURAL: SchemaClone =
        SchemaClone { dimensions: true, attributes: true, nominal_type: false };
}

/// A Tensor Algebra Relation: an ordered list of uniquely named data elements,
/// optionally conforming to a nominal type.
///
/// Element order is significant (it is the output layout), and element names
/// are unique: pushing a taken name renames the new element.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tar {
    name: String,
    elements: Vec<DataElement>,
    nominal_type: Option<Arc<TypeDef>>,
    /// role name -> name of the element implementing it
    roles: BTreeMap<String, String>,
}

impl Tar {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // --- Construction ---

    /// Appends an element and returns the name it was stored under.
    pub fn push(&mut self, element: impl Into<DataElement>) -> String {
        let mut element = element.into();
        if self.has_element(element.name()) {
            let mut candidate = element.name().to_string();
            while self.has_element(&candidate) {
                candidate.push_str(DUPLICATE_NAME_SUFFIX);
            }
            element.set_name(candidate);
        }
        let stored = element.name().to_string();
        self.elements.push(element);
        stored
    }

    pub fn with_dimension(mut self, dimension: Dimension) -> Self {
        self.push(dimension);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, data_type: DataType) -> Self {
        self.push(Attribute::new(name, data_type));
        self
    }

    /// Replaces the nominal type. Existing role bindings are cleared.
    pub fn with_type(mut self, nominal_type: impl Into<Arc<TypeDef>>) -> Self {
        self.nominal_type = Some(nominal_type.into());
        self.roles.clear();
        self
    }

    /// Records that `element` implements `role` of this TAR's type.
    pub fn bind_role(&mut self, role: &str, element: &str) -> Result<(), SchemaError> {
        let known_role = self
            .nominal_type
            .as_ref()
            .map_or(false, |t| t.role(role).is_some());
        if !known_role || !self.has_element(element) {
            return Err(SchemaError::InvalidRoleBinding {
                role: role.to_string(),
                element: element.to_string(),
            });
        }
        self.roles.insert(role.to_string(), element.to_string());
        Ok(())
    }

    pub(crate) fn attach_type(
        &mut self,
        nominal_type: Arc<TypeDef>,
        roles: BTreeMap<String, String>,
    ) {
        self.nominal_type = Some(nominal_type);
        self.roles = roles;
    }

    pub(crate) fn dimension_mut(&mut self, name: &str) -> Option<&mut Dimension> {
        self.elements.iter_mut().find_map(|e| match e {
            DataElement::Dimension(d) if d.name == name => Some(d),
            _ => None,
        })
    }

    /// Builds a new TAR from selected parts of this one.
    pub fn clone_schema(&self, what: SchemaClone) -> Tar {
        let mut cloned = Tar::default();
        for element in &self.elements {
            let keep = match element {
                DataElement::Dimension(_) => what.dimensions,
                DataElement::Attribute(_) => what.attributes,
            };
            if keep {
                cloned.push(element.clone());
            }
        }

        if what.nominal_type {
            if let Some(t) = &self.nominal_type {
                let roles = self
                    .roles
                    .iter()
                    .filter(|(_, element)| cloned.has_element(element))
                    .map(|(role, element)| (role.clone(), element.clone()))
                    .collect();
                cloned.attach_type(Arc::clone(t), roles);
            }
        }
        cloned
    }

    // --- Accessors ---

    pub fn elements(&self) -> &[DataElement] {
        &self.elements
    }

    pub fn element(&self, name: &str) -> Option<&DataElement> {
        self.elements.iter().find(|e| e.name() == name)
    }

    pub fn has_element(&self, name: &str) -> bool {
        self.element(name).is_some()
    }

    pub fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.element(name).and_then(DataElement::as_dimension)
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &Dimension> {
        self.elements.iter().filter_map(DataElement::as_dimension)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.elements.iter().filter_map(DataElement::as_attribute)
    }

    pub fn nominal_type(&self) -> Option<&TypeDef> {
        self.nominal_type.as_deref()
    }

    pub(crate) fn nominal_type_arc(&self) -> Option<&Arc<TypeDef>> {
        self.nominal_type.as_ref()
    }

    pub fn roles(&self) -> &BTreeMap<String, String> {
        &self.roles
    }

    /// The element currently implementing `role`, if any.
    pub fn role_implementation(&self, role: &str) -> Option<&DataElement> {
        self.roles.get(role).and_then(|element| self.element(element))
    }

    /// Total number of cells, `None` on overflow.
    pub fn cell_count(&self) -> Option<i64> {
        self.dimensions()
            .try_fold(1i64, |acc, d| d.checked_length().and_then(|len| acc.checked_mul(len)))
    }

    /// Compact layout signature: `#x,d,int|v,a,float`.
    pub fn signature(&self) -> String {
        let body = self
            .elements
            .iter()
            .map(|e| {
                let tag = if e.is_dimension() { "d" } else { "a" };
                format!("{},{},{}", e.name(), tag, e.data_type())
            })
            .collect::<Vec<_>>()
            .join("|");
        format!("#{}", body)
    }
}

impl fmt::Display for Tar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims = self
            .dimensions()
            .map(|d| format!("{}[{}]{}:{}", d.name, d.data_type, d.lower_bound, d.upper_bound))
            .collect::<Vec<_>>()
            .join(" ");
        let attrs = self
            .attributes()
            .map(|a| format!("{}[{}]", a.name, a.data_type))
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{}<({})><({})>", self.name, dims, attrs)
    }
}
