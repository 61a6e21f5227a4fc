use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Membership status of a person in the church records.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Member,
    Visitor,
    Pending,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Member => "member",
            Status::Visitor => "visitor",
            Status::Pending => "pending",
        }
    }

    /// Parses a status label, English or Portuguese, ignoring case.
    pub fn from_label(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "member" | "membro" => Some(Status::Member),
            "visitor" | "visitante" => Some(Status::Visitor),
            "pending" | "pendente" => Some(Status::Pending),
            _ => None,
        }
    }
}

/// A person as supplied by the data store.
///
/// The record is read-only to the network builder: every field, including
/// parent references that do not resolve, is carried through to the output.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cell_id: Option<String>,
    #[serde(default)]
    pub cell_name: Option<String>,
    #[serde(default)]
    pub leader_name: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub parent_id_evangelism: Option<String>,
    #[serde(default)]
    pub parent_id_discipleship: Option<String>,
    #[serde(default)]
    pub baptized: bool,
    #[serde(default)]
    pub encounter_with_god: bool,
    #[serde(default)]
    pub is_founder: bool,
}

impl PersonRecord {
    pub fn create(id: impl Into<String>, name: impl Into<String>) -> Self {
        PersonRecord {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn founder(mut self) -> Self {
        self.is_founder = true;
        self
    }

    pub fn evangelized_by(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id_evangelism = Some(parent_id.into());
        self
    }

    pub fn led_by(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id_discipleship = Some(parent_id.into());
        self
    }

    pub fn in_cell(mut self, cell_id: impl Into<String>) -> Self {
        self.cell_id = Some(cell_id.into());
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

/// A home-cell group, used only to denormalize names onto people.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CellRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub leader_name: Option<String>,
}

/// Copies `cellName` and `leaderName` from the matching cell onto each person.
///
/// People whose `cell_id` is absent or matches no cell keep their values.
pub fn denormalize_cells(people: &mut [PersonRecord], cells: &[CellRecord]) {
    let by_id: HashMap<&str, &CellRecord> = cells.iter().map(|c| (c.id.as_str(), c)).collect();

    for person in people.iter_mut() {
        let Some(cell) = person.cell_id.as_deref().and_then(|id| by_id.get(id)) else {
            continue;
        };
        person.cell_name = Some(cell.name.clone());
        person.leader_name = cell.leader_name.clone();
    }
}

/// Treats an empty or whitespace-only reference as "no parent".
pub(crate) fn non_empty(reference: Option<&str>) -> Option<&str> {
    reference.filter(|r| !r.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_dashboard_payload() {
        let json = r#"{
            "id": "p1",
            "name": "Ana",
            "cellId": "c1",
            "status": "visitor",
            "parentIdEvangelism": null,
            "parentIdDiscipleship": "p0",
            "isFounder": false
        }"#;
        let person: PersonRecord = serde_json::from_str(json).unwrap();
        assert_eq!(person.status, Status::Visitor);
        assert_eq!(person.parent_id_evangelism, None);
        assert_eq!(person.parent_id_discipleship.as_deref(), Some("p0"));
        assert!(!person.baptized);
        assert_eq!(person.cell_name, None);
    }

    #[test]
    fn rejects_unknown_status() {
        let json = r#"{ "id": "p1", "name": "Ana", "status": "guest" }"#;
        assert!(serde_json::from_str::<PersonRecord>(json).is_err());
    }

    #[test]
    fn denormalize_fills_cell_and_leader() {
        let mut people = vec![
            PersonRecord::create("p1", "Ana").in_cell("c1"),
            PersonRecord::create("p2", "Bia").in_cell("missing"),
            PersonRecord::create("p3", "Caio"),
        ];
        let cells = vec![CellRecord {
            id: "c1".to_string(),
            name: "Célula Centro".to_string(),
            leader_name: Some("Marcos".to_string()),
        }];

        denormalize_cells(&mut people, &cells);

        assert_eq!(people[0].cell_name.as_deref(), Some("Célula Centro"));
        assert_eq!(people[0].leader_name.as_deref(), Some("Marcos"));
        assert_eq!(people[1].cell_name, None);
        assert_eq!(people[2].leader_name, None);
    }

    #[test]
    fn status_accepts_portuguese_labels() {
        assert_eq!(Status::from_label("Membro"), Some(Status::Member));
        assert_eq!(Status::from_label("pendente"), Some(Status::Pending));
        assert_eq!(Status::from_label("x"), None);
    }
}
