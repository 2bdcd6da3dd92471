//! The field mapping table. Every rename rule is generated from it.
//!
//! Every rename rule is generated from this table (see `rules`), so a field
//! that is listed here is rewritten in every lexical context, and a field that
//! is not listed here is never touched.

use heck::ToSnakeCase;
use serde::Serialize;

use crate::defaults::MappingConfig;
use crate::error::{Error, Result};

/// Built-in camelCase → snake_case field names, matching the database schema.
const BUILTIN_FIELDS: &[(&str, &str)] = &[
    // Primary keys and foreign keys
    ("orderId", "order_id"),
    ("brandId", "brand_id"),
    ("clientId", "client_id"),
    ("workspaceId", "workspace_id"),
    ("userId", "user_id"),
    ("designId", "design_id"),
    ("templateId", "template_id"),
    ("actorId", "actor_id"),
    ("entityId", "entity_id"),
    ("entityType", "entity_type"),
    ("machineId", "machine_id"),
    ("inspectionId", "inspection_id"),
    ("operationId", "operation_id"),
    ("routeTemplateId", "route_template_id"),
    ("routingStepId", "routing_step_id"),
    // Common fields
    ("createdAt", "created_at"),
    ("updatedAt", "updated_at"),
    ("targetDate", "target_date"),
    ("startDate", "start_date"),
    ("endDate", "end_date"),
    ("dueDate", "due_date"),
    ("completedAt", "completed_at"),
    ("approvedAt", "approved_at"),
    // Order
    ("poNumber", "po_number"),
    ("productType", "product_type"),
    ("totalQty", "total_qty"),
    ("unitPrice", "unit_price"),
    ("totalValue", "total_value"),
    ("targetDelivery", "target_delivery"),
    ("targetDeliveryDate", "target_delivery_date"),
    ("actualDelivery", "actual_delivery"),
    ("actualDeliveryDate", "actual_delivery_date"),
    // Design
    ("designAssets", "design_assets"),
    ("assetId", "asset_id"),
    ("fileSize", "file_size"),
    ("fileName", "file_name"),
    ("filePath", "file_path"),
    ("mimeType", "mime_type"),
    // Production
    ("standardSpec", "standard_spec"),
    ("actualSpec", "actual_spec"),
    ("qcStatus", "qc_status"),
    ("defectCode", "defect_code"),
    ("defectCount", "defect_count"),
    ("rejectQty", "reject_qty"),
    ("passQty", "pass_qty"),
    // Routing
    ("routingSteps", "routing_steps"),
    ("stepName", "step_name"),
    ("stepId", "step_id"),
    ("workCenter", "work_center"),
    ("plannedStart", "planned_start"),
    ("plannedEnd", "planned_end"),
    ("actualStart", "actual_start"),
    ("actualEnd", "actual_end"),
    // Booleans
    ("isActive", "is_active"),
    ("isDefault", "is_default"),
    ("isComplete", "is_complete"),
    ("isApproved", "is_approved"),
    ("isRejected", "is_rejected"),
    ("canEdit", "can_edit"),
    ("canDelete", "can_delete"),
    ("canApprove", "can_approve"),
    // Financial
    ("costPerUnit", "cost_per_unit"),
    ("laborCost", "labor_cost"),
    ("materialCost", "material_cost"),
    ("totalCost", "total_cost"),
    ("pricingData", "pricing_data"),
    ("invoiceData", "invoice_data"),
    // Timestamps and dates
    ("lastModified", "last_modified"),
    ("dateCreated", "date_created"),
    ("dateUpdated", "date_updated"),
    ("scheduledFor", "scheduled_for"),
];

/// One camelCase → snake_case entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMapping {
    pub from: String,
    pub to: String,
}

impl FieldMapping {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Build a mapping whose target is the snake_case form of `from`.
    pub fn derived(from: &str) -> Self {
        Self::new(from, from.to_snake_case())
    }
}

/// Ordered, validated mapping table.
#[derive(Debug, Clone, Serialize)]
pub struct MappingTable {
    entries: Vec<FieldMapping>,
}

impl MappingTable {
    /// The built-in table.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_FIELDS
                .iter()
                .map(|(from, to)| FieldMapping::new(*from, *to))
                .collect(),
        }
    }

    /// Build a table from arbitrary entries, validating each one.
    pub fn new(entries: Vec<FieldMapping>) -> Result<Self> {
        let mut table = Self {
            entries: Vec::with_capacity(entries.len()),
        };
        for entry in entries {
            table.push(entry)?;
        }
        Ok(table)
    }

    /// Append configured mappings. An entry identical to an existing one is
    /// merged; the same key with a different target is rejected.
    pub fn with_extra(mut self, extra: &[MappingConfig]) -> Result<Self> {
        for config in extra {
            let entry = match &config.to {
                Some(to) => FieldMapping::new(config.from.trim(), to.trim()),
                None => FieldMapping::derived(config.from.trim()),
            };
            self.push(entry)?;
        }
        Ok(self)
    }

    fn push(&mut self, entry: FieldMapping) -> Result<()> {
        validate_entry(&entry.from, &entry.to)?;

        if let Some(existing) = self.get(&entry.from) {
            if existing == entry.to {
                return Ok(());
            }
            return Err(Error::mapping_duplicate_key(&entry.from, existing, &entry.to));
        }

        self.entries.push(entry);
        Ok(())
    }

    /// Look up the snake_case target for a camelCase field.
    pub fn get(&self, from: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.from == from)
            .map(|e| e.to.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldMapping> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MappingTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Check that `from` is a camelCase identifier and `to` a distinct snake_case one.
pub fn validate_entry(from: &str, to: &str) -> Result<()> {
    if !is_identifier(from) {
        return Err(Error::mapping_invalid_entry(from, to, "key is not an identifier"));
    }
    if !from.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(Error::mapping_invalid_entry(
            from,
            to,
            "key has no uppercase letter",
        ));
    }
    if !is_identifier(to) {
        return Err(Error::mapping_invalid_entry(from, to, "value is not an identifier"));
    }
    if to.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(Error::mapping_invalid_entry(
            from,
            to,
            "value contains uppercase letters",
        ));
    }
    Ok(())
}
