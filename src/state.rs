use tracing::{debug, info};

use crate::domain::{
    DEFAULT_GRADUATION_YEAR, DraftField, DraftRecord, FieldValue, NewStudent, StudentRecord,
    ValidationError,
};

/// Initial records used for demos and the default server start.
pub fn seed_students() -> Vec<StudentRecord> {
    vec![
        StudentRecord {
            id: 1,
            name: "Emily Rodriguez".to_string(),
            major: "Computer Science".to_string(),
            email: "emily.rodriguez@university.edu".to_string(),
            graduation_year: 2025,
        },
        StudentRecord {
            id: 2,
            name: "Michael Chen".to_string(),
            major: "Data Science".to_string(),
            email: "michael.chen@university.edu".to_string(),
            graduation_year: 2024,
        },
        StudentRecord {
            id: 3,
            name: "Sarah Johnson".to_string(),
            major: "Software Engineering".to_string(),
            email: "sarah.johnson@university.edu".to_string(),
            graduation_year: 2026,
        },
    ]
}

/// Ordered, append-only collection of committed records.
#[derive(Debug, Clone, Default)]
pub struct RosterStore {
    students: Vec<StudentRecord>,
}

impl RosterStore {
    pub fn new(students: Vec<StudentRecord>) -> Self {
        Self { students }
    }

    pub fn seeded() -> Self {
        Self::new(seed_students())
    }

    /// Records in insertion order, which is also display order.
    pub fn list(&self) -> &[StudentRecord] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Assigns `id = len + 1` and pushes the record to the end.
    ///
    /// Records are never removed, so the length-derived id stays unique and strictly
    /// increasing. Adding removal would require a separate monotonic counter.
    pub fn append(&mut self, candidate: NewStudent) -> StudentRecord {
        let id = self.students.len() as u64 + 1;
        let record = candidate.into_record(id);
        self.students.push(record.clone());
        info!(student_id = id, roster_len = self.students.len(), "student appended");
        record
    }
}

/// Owns the single in-progress draft.
#[derive(Debug, Clone)]
pub struct PendingEntryForm {
    default_graduation_year: i32,
    draft: DraftRecord,
}

impl Default for PendingEntryForm {
    fn default() -> Self {
        Self::new(DEFAULT_GRADUATION_YEAR)
    }
}

impl PendingEntryForm {
    pub fn new(default_graduation_year: i32) -> Self {
        Self {
            default_graduation_year,
            draft: DraftRecord::with_graduation_year(default_graduation_year),
        }
    }

    pub fn draft(&self) -> &DraftRecord {
        &self.draft
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<FieldValue>) {
        let value = value.into();
        debug!(field = field.as_str(), "draft field updated");
        self.draft.set(field, value);
    }

    /// Validates the draft and commits it to `store`.
    ///
    /// On error neither the draft nor the store is touched. On success the draft is reset to
    /// its defaults.
    pub fn submit(&mut self, store: &mut RosterStore) -> Result<StudentRecord, ValidationError> {
        let candidate = self.draft.validate().inspect_err(|e| {
            debug!(code = e.code(), "draft submit rejected");
        })?;
        let record = store.append(candidate);
        self.reset();
        Ok(record)
    }

    pub fn reset(&mut self) {
        self.draft = DraftRecord::with_graduation_year(self.default_graduation_year);
    }
}

#[derive(Debug, Clone)]
pub struct DirectoryInit {
    pub seed: bool,
    pub default_graduation_year: i32,
}

impl Default for DirectoryInit {
    fn default() -> Self {
        Self {
            seed: true,
            default_graduation_year: DEFAULT_GRADUATION_YEAR,
        }
    }
}

/// The roster and its entry form, shared together behind one lock so id assignment is
/// serialized.
#[derive(Debug, Clone)]
pub struct Directory {
    pub store: RosterStore,
    pub form: PendingEntryForm,
}

impl Directory {
    pub fn new(init: DirectoryInit) -> Self {
        let store = if init.seed {
            RosterStore::seeded()
        } else {
            RosterStore::default()
        };
        Self {
            store,
            form: PendingEntryForm::new(init.default_graduation_year),
        }
    }

    pub fn submit(&mut self) -> Result<StudentRecord, ValidationError> {
        self.form.submit(&mut self.store)
    }
}
