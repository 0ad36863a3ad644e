use std::fmt::Write;

use crate::config::AssistantConfig;
use crate::models::{Member, Snapshot};

const CONTEXT_HEADER: &str =
    "Here is all the information about the user's family management system:\n\n";

/// Renders a data snapshot into the plain-text context sent to the LLM.
///
/// Sections appear only when they have data. Documents, health records and
/// reminders are truncated to the configured limits so the prompt stays
/// bounded.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    max_documents: usize,
    max_health_records: usize,
    max_reminders: usize,
}

impl ContextAssembler {
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            max_documents: config.max_context_documents,
            max_health_records: config.max_context_health_records,
            max_reminders: config.max_context_reminders,
        }
    }

    /// Build the context. Family members come from the snapshot when it
    /// carries them, otherwise from the retriever's `ranked` short list.
    pub fn build(&self, snapshot: Option<&Snapshot>, ranked: &[Member]) -> String {
        let empty = Snapshot::default();
        let snapshot = snapshot.unwrap_or(&empty);
        let mut context = String::from(CONTEXT_HEADER);

        if let Some(stats) = &snapshot.stats {
            context.push_str("=== STATISTICS ===\n");
            let _ = writeln!(context, "Total Family Members: {}", stats.total_family);
            let _ = writeln!(context, "Total Documents: {}", stats.total_documents);
            let _ = writeln!(context, "Total Vehicles: {}", stats.total_vehicles);
            let _ = writeln!(context, "Total Reminders: {}\n", stats.total_reminders);
        }

        let members = snapshot.family_members.as_deref().unwrap_or(ranked);
        if !members.is_empty() {
            context.push_str("=== FAMILY MEMBERS ===\n");
            for member in members {
                write_member(&mut context, member);
            }
        }

        self.write_documents(&mut context, snapshot);
        write_vehicles(&mut context, snapshot);
        self.write_health(&mut context, snapshot);
        self.write_reminders(&mut context, snapshot);

        context
    }

    fn write_documents(&self, context: &mut String, snapshot: &Snapshot) {
        let docs = &snapshot.documents;
        if docs.is_empty() {
            return;
        }

        context.push_str("=== DOCUMENTS ===\n");
        let _ = writeln!(context, "Total documents uploaded: {}", docs.len());
        for doc in docs.iter().take(self.max_documents) {
            let _ = write!(
                context,
                "- {}: {}",
                doc.doc_type.as_deref().unwrap_or("Document"),
                doc.name.as_deref().unwrap_or("Unknown")
            );
            if let Some(owner) = &doc.person_name {
                let _ = write!(context, " (for {owner})");
            }
            if let Some(expires) = &doc.expires {
                let _ = write!(context, " - Expires: {expires}");
            }
            context.push('\n');
        }
        if docs.len() > self.max_documents {
            let _ = writeln!(
                context,
                "... and {} more documents",
                docs.len() - self.max_documents
            );
        }
        context.push('\n');
    }

    fn write_health(&self, context: &mut String, snapshot: &Snapshot) {
        let records = &snapshot.health;
        if records.is_empty() {
            return;
        }

        context.push_str("=== HEALTH RECORDS ===\n");
        let _ = writeln!(context, "Total health records: {}", records.len());
        for record in records.iter().take(self.max_health_records) {
            let _ = writeln!(
                context,
                "- {} for {}",
                record.title.as_deref().unwrap_or("Health record"),
                record.person_name.as_deref().unwrap_or("Unknown")
            );
        }
        context.push('\n');
    }

    fn write_reminders(&self, context: &mut String, snapshot: &Snapshot) {
        let reminders = &snapshot.reminders;
        if reminders.is_empty() {
            return;
        }

        context.push_str("=== ACTIVE REMINDERS ===\n");
        let _ = writeln!(context, "Total reminders: {}", reminders.len());
        for reminder in reminders.iter().take(self.max_reminders) {
            let _ = writeln!(
                context,
                "- {}: {}",
                reminder.title.as_deref().unwrap_or("Reminder"),
                reminder.person.as_deref().unwrap_or("")
            );
        }
        context.push('\n');
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(&AssistantConfig::default())
    }
}

fn write_member(context: &mut String, member: &Member) {
    let relation = if member.relation.is_empty() {
        "Unknown"
    } else {
        member.relation.as_str()
    };
    let age = if member.age.is_empty() {
        "N/A"
    } else {
        member.age.as_str()
    };

    let _ = writeln!(context, "- {} ({relation})", member.name);
    let _ = writeln!(context, "  Age: {age}");
    for (label, value) in member.optional_fields() {
        let _ = writeln!(context, "  {label}: {value}");
    }
    context.push('\n');
}

fn write_vehicles(context: &mut String, snapshot: &Snapshot) {
    let vehicles = &snapshot.vehicles;
    if vehicles.is_empty() {
        return;
    }

    context.push_str("=== VEHICLES ===\n");
    let _ = writeln!(context, "Total vehicles: {}", vehicles.len());
    for vehicle in vehicles {
        let _ = writeln!(
            context,
            "- {} {} ({})",
            vehicle.make.as_deref().unwrap_or(""),
            vehicle.model.as_deref().unwrap_or(""),
            vehicle.year.as_deref().unwrap_or("")
        );
        if let Some(plate) = &vehicle.plate_number {
            let _ = writeln!(context, "  Plate: {plate}");
        }
    }
    context.push('\n');
}
