use crate::error::Result;
use crate::integrity::IntegrityReport;
use crate::metrics::{NetworkSummary, summarize};
use crate::network::{MemberNode, NetworkView};
use serde::Serialize;

const CSV_HEADER: &str = "id,name,group,level,total_descendants,children,status,cell_name,\
                          leader_name,parent_id,baptized,encounter_with_god,is_founder";

/// Convert a network view to CSV format
///
/// One row per person, connected people first. The `group` column is
/// `connected` or `standby`; `parent_id` is the active-mode reference exactly
/// as it was supplied, resolvable or not; `children` joins child ids with `;`.
///
/// # Examples
/// ```
/// use genealogy::{Mode, PersonRecord, build};
/// use genealogy::downloader::to_csv;
///
/// let people = vec![PersonRecord::create("a", "Ana").founder()];
/// let csv = to_csv(&build(&people, Mode::Evangelism));
/// assert!(csv.lines().nth(1).unwrap().starts_with("a,Ana,connected,0,0"));
/// ```
pub fn to_csv(view: &NetworkView) -> String {
    let mut csv_content = String::from(CSV_HEADER);
    csv_content.push('\n');

    let groups = [("connected", &view.connected), ("standby", &view.standby)];
    for (group, nodes) in groups {
        for node in nodes.iter() {
            csv_content.push_str(&csv_row(node, group, view));
            csv_content.push('\n');
        }
    }

    csv_content
}

fn csv_row(node: &MemberNode, group: &str, view: &NetworkView) -> String {
    let person = &node.person;
    let parent_id = view.mode.parent_id_of(person).unwrap_or("");
    let fields = [
        escape(&person.id),
        escape(&person.name),
        group.to_string(),
        node.level.to_string(),
        node.total_descendants.to_string(),
        escape(&node.child_ids.join(";")),
        person.status.as_str().to_string(),
        escape(person.cell_name.as_deref().unwrap_or("")),
        escape(person.leader_name.as_deref().unwrap_or("")),
        escape(parent_id),
        person.baptized.to_string(),
        person.encounter_with_god.to_string(),
        person.is_founder.to_string(),
    ];
    fields.join(",")
}

// Quote fields that contain commas, quotes or newlines
fn escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[derive(Serialize)]
struct JsonExport<'a> {
    summary: NetworkSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    integrity: Option<&'a IntegrityReport>,
    network: &'a NetworkView,
}

/// Convert a network view to pretty-printed JSON with its summary attached
pub fn to_json(view: &NetworkView, integrity: Option<&IntegrityReport>) -> Result<String> {
    let export = JsonExport {
        summary: summarize(view),
        integrity,
        network: view,
    };
    Ok(serde_json::to_string_pretty(&export)?)
}
