// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vehicle taxonomy: makes, models, variants, categories and the mappings
//! that price a concrete vehicle.
//!
//! All mutating methods validate fully before touching any collection, so a
//! returned error always leaves the master unchanged.

use crate::error::DomainError;
use crate::types::VehicleType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Maximum length of the slug part of a generated identifier.
pub const MAX_SLUG_LEN: usize = 22;

/// The four editable taxonomy lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MasterKind {
    /// Manufacturer.
    Make,
    /// Model of a make.
    Model,
    /// Trim of a model.
    Variant,
    /// Pricing category.
    Category,
}

impl MasterKind {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Make => "make",
            Self::Model => "model",
            Self::Variant => "variant",
            Self::Category => "category",
        }
    }

    /// Identifier prefix for generated ids.
    #[must_use]
    pub const fn id_prefix(&self) -> &'static str {
        match self {
            Self::Make => "MAKE-",
            Self::Model => "MODEL-",
            Self::Variant => "VAR-",
            Self::Category => "CAT-",
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Make => "Make",
            Self::Model => "Model",
            Self::Variant => "Variant",
            Self::Category => "Category",
        }
    }
}

impl FromStr for MasterKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "make" | "makes" => Ok(Self::Make),
            "model" | "models" => Ok(Self::Model),
            "variant" | "variants" => Ok(Self::Variant),
            "category" | "categories" => Ok(Self::Category),
            other => Err(DomainError::InvalidValue {
                field: "vehicle master kind",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for MasterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A manufacturer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Make {
    pub id: String,
    pub name: String,
}

/// A model belonging to a make.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    pub make_id: String,
}

/// A variant belonging to a model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    pub name: String,
    pub model_id: String,
}

/// A pricing category (e.g. Hatchback, SUV).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Any taxonomy item, as returned by create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MasterItem {
    Model(Model),
    Variant(Variant),
    Make(Make),
    Category(Category),
}

impl MasterItem {
    /// Returns the item identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Make(m) => &m.id,
            Self::Model(m) => &m.id,
            Self::Variant(v) => &v.id,
            Self::Category(c) => &c.id,
        }
    }
}

/// Maps a concrete vehicle to a pricing category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleMapping {
    pub id: String,
    pub condition: VehicleType,
    pub make_id: String,
    pub model_id: String,
    pub variant_id: String,
    pub category_id: String,
}

impl VehicleMapping {
    /// Returns true if the mapping is for exactly this vehicle.
    #[must_use]
    pub fn matches(&self, condition: VehicleType, make_id: &str, model_id: &str, variant_id: &str) -> bool {
        self.condition == condition
            && self.make_id == make_id
            && self.model_id == model_id
            && self.variant_id == variant_id
    }
}

/// Inspection price attached to one mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingPricing {
    /// Price for customers within range.
    pub base_inr: u32,
    /// Distance beyond which the surcharge applies.
    pub distant_after_km: u32,
    /// Surcharge for distant customers.
    pub distant_extra_inr: u32,
}

/// Optional changes to a mapping. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingPatch {
    pub condition: Option<VehicleType>,
    pub make_id: Option<String>,
    pub model_id: Option<String>,
    pub variant_id: Option<String>,
    pub category_id: Option<String>,
}

/// Where a quoted price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    /// Pricing configured on the mapping itself.
    Mapping,
    /// The mapping's category price.
    Category,
    /// The global default price.
    Default,
}

/// Price for inspecting a particular vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub mapping_id: String,
    pub category_id: String,
    pub base_inr: u32,
    pub distance_extra_inr: u32,
    pub total_inr: u32,
    pub source: QuoteSource,
}

/// What a delete removed, for auditing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeReport {
    pub models: Vec<String>,
    pub variants: Vec<String>,
    pub mappings: Vec<String>,
}

/// Derives the slug part of an identifier from a display name.
///
/// Uppercases ASCII alphanumerics, collapses every other run of characters
/// into a single `-`, strips leading and trailing separators, then truncates.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug: String = String::with_capacity(name.len());
    let mut pending_separator: bool = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_uppercase());
        } else {
            pending_separator = true;
        }
    }
    slug.chars().take(MAX_SLUG_LEN).collect()
}

/// Builds the identifier for a new item of `kind` named `name`.
///
/// # Errors
///
/// Returns an error if the name has no alphanumeric characters.
pub fn master_item_id(kind: MasterKind, name: &str) -> Result<String, DomainError> {
    let slug: String = slugify(name);
    if slug.is_empty() {
        return Err(DomainError::InvalidValue {
            field: "name",
            value: name.to_string(),
        });
    }
    Ok(format!("{}{slug}", kind.id_prefix()))
}

fn clean_name(name: &str) -> Result<String, DomainError> {
    let cleaned: &str = name.trim();
    if cleaned.is_empty() {
        return Err(DomainError::MissingField { field: "Name" });
    }
    Ok(cleaned.to_string())
}

/// The complete vehicle taxonomy with its pricing tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleMaster {
    pub makes: Vec<Make>,
    pub models: Vec<Model>,
    pub variants: Vec<Variant>,
    pub categories: Vec<Category>,
    pub mappings: Vec<VehicleMapping>,
    pub mapping_pricing: BTreeMap<String, MappingPricing>,
    pub category_pricing: BTreeMap<String, u32>,
}

impl VehicleMaster {
    /// Looks up a model by id.
    #[must_use]
    pub fn model(&self, id: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Looks up a variant by id.
    #[must_use]
    pub fn variant(&self, id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == id)
    }

    /// Looks up a mapping by id.
    #[must_use]
    pub fn mapping(&self, id: &str) -> Option<&VehicleMapping> {
        self.mappings.iter().find(|m| m.id == id)
    }

    /// Finds the mapping for an exact vehicle tuple.
    #[must_use]
    pub fn find_mapping(
        &self,
        condition: VehicleType,
        make_id: &str,
        model_id: &str,
        variant_id: &str,
    ) -> Option<&VehicleMapping> {
        self.mappings
            .iter()
            .find(|m| m.matches(condition, make_id, model_id, variant_id))
    }

    /// Returns true if an item of `kind` with this id exists.
    #[must_use]
    pub fn contains(&self, kind: MasterKind, id: &str) -> bool {
        match kind {
            MasterKind::Make => self.makes.iter().any(|m| m.id == id),
            MasterKind::Model => self.models.iter().any(|m| m.id == id),
            MasterKind::Variant => self.variants.iter().any(|v| v.id == id),
            MasterKind::Category => self.categories.iter().any(|c| c.id == id),
        }
    }

    /// Returns a snapshot of an item of `kind`.
    #[must_use]
    pub fn item(&self, kind: MasterKind, id: &str) -> Option<MasterItem> {
        match kind {
            MasterKind::Make => self
                .makes
                .iter()
                .find(|m| m.id == id)
                .cloned()
                .map(MasterItem::Make),
            MasterKind::Model => self.model(id).cloned().map(MasterItem::Model),
            MasterKind::Variant => self.variant(id).cloned().map(MasterItem::Variant),
            MasterKind::Category => self
                .categories
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .map(MasterItem::Category),
        }
    }

    /// Returns true if another item of `kind` already uses `name`.
    fn name_taken(&self, kind: MasterKind, name: &str, except_id: Option<&str>) -> bool {
        let lowered: String = name.to_lowercase();
        let clash = |id: &str, other: &str| {
            Some(id) != except_id && other.to_lowercase() == lowered
        };
        match kind {
            MasterKind::Make => self.makes.iter().any(|m| clash(&m.id, &m.name)),
            MasterKind::Model => self.models.iter().any(|m| clash(&m.id, &m.name)),
            MasterKind::Variant => self.variants.iter().any(|v| clash(&v.id, &v.name)),
            MasterKind::Category => self.categories.iter().any(|c| clash(&c.id, &c.name)),
        }
    }

    fn require(&self, kind: MasterKind, id: &str) -> Result<(), DomainError> {
        if self.contains(kind, id) {
            Ok(())
        } else {
            Err(DomainError::NotFound {
                entity: kind.label(),
                id: id.to_string(),
            })
        }
    }

    /// Creates a taxonomy item. New items are placed first in their list.
    ///
    /// `parent_id` is the make for a model and the model for a variant; it is
    /// ignored for makes and categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the derived id or the name is
    /// already used, or the required parent is missing.
    pub fn create_item(
        &mut self,
        kind: MasterKind,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<MasterItem, DomainError> {
        let name: String = clean_name(name)?;
        let id: String = master_item_id(kind, &name)?;
        if self.contains(kind, &id) {
            return Err(DomainError::DuplicateId {
                entity: kind.label(),
                id,
            });
        }
        if self.name_taken(kind, &name, None) {
            return Err(DomainError::DuplicateName {
                entity: kind.label(),
                name,
            });
        }

        let parent = parent_id.map(str::trim).filter(|p| !p.is_empty());
        let item: MasterItem = match kind {
            MasterKind::Make => {
                let make = Make { id, name };
                self.makes.insert(0, make.clone());
                MasterItem::Make(make)
            }
            MasterKind::Model => {
                let make_id: &str = parent.ok_or(DomainError::MissingField { field: "Make" })?;
                self.require(MasterKind::Make, make_id)?;
                let model = Model {
                    id,
                    name,
                    make_id: make_id.to_string(),
                };
                self.models.insert(0, model.clone());
                MasterItem::Model(model)
            }
            MasterKind::Variant => {
                let model_id: &str = parent.ok_or(DomainError::MissingField { field: "Model" })?;
                self.require(MasterKind::Model, model_id)?;
                let variant = Variant {
                    id,
                    name,
                    model_id: model_id.to_string(),
                };
                self.variants.insert(0, variant.clone());
                MasterItem::Variant(variant)
            }
            MasterKind::Category => {
                let category = Category { id, name };
                self.categories.insert(0, category.clone());
                MasterItem::Category(category)
            }
        };
        Ok(item)
    }

    /// Renames and/or re-parents an item. Ids never change.
    ///
    /// Re-parenting a model moves its mappings to the new make; re-parenting
    /// a variant moves its mappings to the new model and that model's make.
    ///
    /// # Errors
    ///
    /// Returns an error if the item or new parent is missing, or the new name
    /// is blank or already used by another item of the same kind.
    pub fn update_item(
        &mut self,
        kind: MasterKind,
        id: &str,
        name: Option<&str>,
        parent_id: Option<&str>,
    ) -> Result<MasterItem, DomainError> {
        self.require(kind, id)?;
        let name: Option<String> = name.map(clean_name).transpose()?;
        if let Some(name) = &name {
            if self.name_taken(kind, name, Some(id)) {
                return Err(DomainError::DuplicateName {
                    entity: kind.label(),
                    name: name.clone(),
                });
            }
        }

        let parent: Option<String> = match (kind, parent_id.map(str::trim)) {
            (MasterKind::Model, Some("")) => return Err(DomainError::MissingField { field: "Make" }),
            (MasterKind::Variant, Some("")) => {
                return Err(DomainError::MissingField { field: "Model" });
            }
            (MasterKind::Model, Some(make_id)) => {
                self.require(MasterKind::Make, make_id)?;
                Some(make_id.to_string())
            }
            (MasterKind::Variant, Some(model_id)) => {
                self.require(MasterKind::Model, model_id)?;
                Some(model_id.to_string())
            }
            _ => None,
        };

        match kind {
            MasterKind::Make => {
                if let (Some(make), Some(name)) = (self.makes.iter_mut().find(|m| m.id == id), name) {
                    make.name = name;
                }
            }
            MasterKind::Category => {
                if let (Some(category), Some(name)) =
                    (self.categories.iter_mut().find(|c| c.id == id), name)
                {
                    category.name = name;
                }
            }
            MasterKind::Model => {
                if let Some(model) = self.models.iter_mut().find(|m| m.id == id) {
                    if let Some(name) = name {
                        model.name = name;
                    }
                    match parent {
                        Some(make_id) if model.make_id != make_id => {
                            model.make_id.clone_from(&make_id);
                            for mapping in self.mappings.iter_mut().filter(|m| m.model_id == id) {
                                mapping.make_id.clone_from(&make_id);
                            }
                        }
                        _ => {}
                    }
                }
            }
            MasterKind::Variant => {
                let new_make_id: Option<String> = parent
                    .as_deref()
                    .and_then(|model_id| self.model(model_id))
                    .map(|m| m.make_id.clone());
                if let Some(variant) = self.variants.iter_mut().find(|v| v.id == id) {
                    if let Some(name) = name {
                        variant.name = name;
                    }
                    match parent {
                        Some(model_id) if variant.model_id != model_id => {
                            variant.model_id.clone_from(&model_id);
                            for mapping in self.mappings.iter_mut().filter(|m| m.variant_id == id) {
                                mapping.model_id.clone_from(&model_id);
                                if let Some(make_id) = &new_make_id {
                                    mapping.make_id.clone_from(make_id);
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        self.item(kind, id).ok_or_else(|| DomainError::NotFound {
            entity: kind.label(),
            id: id.to_string(),
        })
    }

    /// Deletes an item and everything that depends on it.
    ///
    /// - make: its models, their variants, and mappings referencing the make
    ///   or any of those models
    /// - model: its variants and mappings referencing it
    /// - variant: mappings referencing it
    /// - category: its price and mappings referencing it
    ///
    /// Pricing of every removed mapping is removed too.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the item does not exist.
    pub fn delete_item(
        &mut self,
        kind: MasterKind,
        id: &str,
    ) -> Result<(MasterItem, CascadeReport), DomainError> {
        let removed: MasterItem = self.item(kind, id).ok_or_else(|| DomainError::NotFound {
            entity: kind.label(),
            id: id.to_string(),
        })?;
        let mut report = CascadeReport::default();

        match kind {
            MasterKind::Make => {
                self.makes.retain(|m| m.id != id);
                report.models = self
                    .models
                    .iter()
                    .filter(|m| m.make_id == id)
                    .map(|m| m.id.clone())
                    .collect();
                self.models.retain(|m| m.make_id != id);
                report.variants = self.remove_variants_of(&report.models);
                let models: &[String] = &report.models;
                report.mappings =
                    self.remove_mappings(|m| m.make_id == id || models.contains(&m.model_id));
            }
            MasterKind::Model => {
                self.models.retain(|m| m.id != id);
                report.variants = self.remove_variants_of(&[id.to_string()]);
                report.mappings = self.remove_mappings(|m| m.model_id == id);
            }
            MasterKind::Variant => {
                self.variants.retain(|v| v.id != id);
                report.mappings = self.remove_mappings(|m| m.variant_id == id);
            }
            MasterKind::Category => {
                self.categories.retain(|c| c.id != id);
                self.category_pricing.remove(id);
                report.mappings = self.remove_mappings(|m| m.category_id == id);
            }
        }

        Ok((removed, report))
    }

    fn remove_variants_of(&mut self, model_ids: &[String]) -> Vec<String> {
        let removed: Vec<String> = self
            .variants
            .iter()
            .filter(|v| model_ids.contains(&v.model_id))
            .map(|v| v.id.clone())
            .collect();
        self.variants.retain(|v| !model_ids.contains(&v.model_id));
        removed
    }

    fn remove_mappings<F>(&mut self, predicate: F) -> Vec<String>
    where
        F: Fn(&VehicleMapping) -> bool,
    {
        let removed: Vec<String> = self
            .mappings
            .iter()
            .filter(|m| predicate(m))
            .map(|m| m.id.clone())
            .collect();
        self.mappings.retain(|m| !predicate(m));
        for mapping_id in &removed {
            self.mapping_pricing.remove(mapping_id);
        }
        removed
    }

    /// Validates that every referenced item exists and the hierarchy holds.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for missing references and `HierarchyMismatch` when
    /// the model is not under the make or the variant is not under the model.
    pub fn validate_mapping(&self, mapping: &VehicleMapping) -> Result<(), DomainError> {
        self.require(MasterKind::Make, &mapping.make_id)?;
        self.require(MasterKind::Model, &mapping.model_id)?;
        self.require(MasterKind::Variant, &mapping.variant_id)?;
        self.require(MasterKind::Category, &mapping.category_id)?;

        if let Some(model) = self.model(&mapping.model_id) {
            if model.make_id != mapping.make_id {
                return Err(DomainError::HierarchyMismatch {
                    child: "Model",
                    child_id: model.id.clone(),
                    parent: "Make",
                    parent_id: mapping.make_id.clone(),
                });
            }
        }
        if let Some(variant) = self.variant(&mapping.variant_id) {
            if variant.model_id != mapping.model_id {
                return Err(DomainError::HierarchyMismatch {
                    child: "Variant",
                    child_id: variant.id.clone(),
                    parent: "Model",
                    parent_id: mapping.model_id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Applies a patch to an existing mapping after validating the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the mapping is missing or the patched mapping is
    /// invalid.
    pub fn update_mapping(
        &mut self,
        id: &str,
        patch: MappingPatch,
    ) -> Result<(VehicleMapping, VehicleMapping), DomainError> {
        let before: VehicleMapping =
            self.mapping(id).cloned().ok_or_else(|| DomainError::NotFound {
                entity: "Mapping",
                id: id.to_string(),
            })?;
        let after = VehicleMapping {
            id: before.id.clone(),
            condition: patch.condition.unwrap_or(before.condition),
            make_id: patch.make_id.unwrap_or_else(|| before.make_id.clone()),
            model_id: patch.model_id.unwrap_or_else(|| before.model_id.clone()),
            variant_id: patch.variant_id.unwrap_or_else(|| before.variant_id.clone()),
            category_id: patch.category_id.unwrap_or_else(|| before.category_id.clone()),
        };
        self.validate_mapping(&after)?;
        if let Some(slot) = self.mappings.iter_mut().find(|m| m.id == id) {
            *slot = after.clone();
        }
        Ok((before, after))
    }

    /// Removes a mapping and its pricing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the mapping does not exist.
    pub fn delete_mapping(&mut self, id: &str) -> Result<VehicleMapping, DomainError> {
        let removed: VehicleMapping =
            self.mapping(id).cloned().ok_or_else(|| DomainError::NotFound {
                entity: "Mapping",
                id: id.to_string(),
            })?;
        self.mappings.retain(|m| m.id != id);
        self.mapping_pricing.remove(id);
        Ok(removed)
    }

    /// Sets the pricing of a mapping, returning the previous pricing.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the mapping does not exist.
    pub fn set_mapping_pricing(
        &mut self,
        mapping_id: &str,
        pricing: MappingPricing,
    ) -> Result<Option<MappingPricing>, DomainError> {
        if self.mapping(mapping_id).is_none() {
            return Err(DomainError::NotFound {
                entity: "Mapping",
                id: mapping_id.to_string(),
            });
        }
        Ok(self.mapping_pricing.insert(mapping_id.to_string(), pricing))
    }

    /// Sets the price of a category, returning the previous price.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the category does not exist.
    pub fn set_category_pricing(
        &mut self,
        category_id: &str,
        price_inr: u32,
    ) -> Result<Option<u32>, DomainError> {
        self.require(MasterKind::Category, category_id)?;
        Ok(self
            .category_pricing
            .insert(category_id.to_string(), price_inr))
    }

    /// Prices an inspection for a concrete vehicle.
    ///
    /// Mapping pricing wins, then the category price, then `default_inr`.
    /// The distance surcharge only applies with mapping pricing and only when
    /// `distance_km` is strictly beyond the threshold.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` when no mapping covers the vehicle.
    pub fn quote(
        &self,
        condition: VehicleType,
        make_id: &str,
        model_id: &str,
        variant_id: &str,
        distance_km: u32,
        default_inr: u32,
    ) -> Result<PriceQuote, DomainError> {
        let mapping: &VehicleMapping = self
            .find_mapping(condition, make_id, model_id, variant_id)
            .ok_or_else(|| DomainError::NotFound {
                entity: "Mapping",
                id: format!("{condition}/{make_id}/{model_id}/{variant_id}"),
            })?;

        let (base_inr, distance_extra_inr, source) =
            if let Some(pricing) = self.mapping_pricing.get(&mapping.id) {
                let extra: u32 = if distance_km > pricing.distant_after_km {
                    pricing.distant_extra_inr
                } else {
                    0
                };
                (pricing.base_inr, extra, QuoteSource::Mapping)
            } else if let Some(price) = self.category_pricing.get(&mapping.category_id) {
                (*price, 0, QuoteSource::Category)
            } else {
                (default_inr, 0, QuoteSource::Default)
            };

        Ok(PriceQuote {
            mapping_id: mapping.id.clone(),
            category_id: mapping.category_id.clone(),
            base_inr,
            distance_extra_inr,
            total_inr: base_inr.saturating_add(distance_extra_inr),
            source,
        })
    }
}
