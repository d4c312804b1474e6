use crate::planner::logical::LogicalPlan;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplainRow {
    pub id: String,
    pub info: String,
}

#[derive(Debug, Clone)]
pub struct ExplainReport {
    pub root: ExplainNode,
}

impl ExplainReport {
    pub fn rows(&self) -> Vec<ExplainRow> {
        self.root.collect_rows()
    }

    pub fn from_logical(plan: &LogicalPlan) -> Self {
        ExplainReport {
            root: build_logical_node(plan),
        }
    }

    pub fn topology_string(&self) -> String {
        self.root.topology_string()
    }

    pub fn table_string(&self) -> String {
        let mut rows = self.rows();
        rows.insert(
            0,
            ExplainRow {
                id: "id".to_string(),
                info: "info".to_string(),
            },
        );
        let id_width = rows.iter().map(|r| r.id.chars().count()).max().unwrap_or(2);
        let info_width = rows.iter().map(|r| r.info.len()).max().unwrap_or(4);

        rows.into_iter()
            .enumerate()
            .map(|(idx, row)| {
                let sep = if idx == 0 { "-" } else { " " };
                format!(
                    "{} {:<id_w$} | {:<info_w$}",
                    sep,
                    row.id,
                    row.info,
                    id_w = id_width,
                    info_w = info_width
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.root).unwrap_or(serde_json::Value::Null)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplainNode {
    pub id: String,
    pub operator: String,
    pub info: Vec<String>,
    pub children: Vec<ExplainNode>,
}

impl ExplainNode {
    fn topology_string(&self) -> String {
        let mut lines = Vec::new();
        self.collect_topology(0, &mut lines);
        lines.join("\n")
    }

    fn collect_topology(&self, indent: usize, lines: &mut Vec<String>) {
        let spacing = "  ".repeat(indent);
        let info = if self.info.is_empty() {
            "".to_string()
        } else {
            format!(" [{}]", self.info.join(", "))
        };
        lines.push(format!("{}{} ({}){}", spacing, self.operator, self.id, info));
        for child in &self.children {
            child.collect_topology(indent + 1, lines);
        }
    }

    fn collect_rows(&self) -> Vec<ExplainRow> {
        let mut rows = Vec::new();
        self.collect_rows_inner(0, &[], true, &mut rows);
        rows
    }

    fn collect_rows_inner(
        &self,
        depth: usize,
        ancestors_last: &[bool],
        is_last: bool,
        rows: &mut Vec<ExplainRow>,
    ) {
        let mut prefix = String::new();
        for ancestor_last in ancestors_last {
            prefix.push_str(if *ancestor_last { "  " } else { "│ " });
        }
        if depth > 0 {
            prefix.push_str(if is_last { "└─" } else { "├─" });
        }

        rows.push(ExplainRow {
            id: format!("{}{}", prefix, self.id),
            info: self.info.join(", "),
        });

        let child_count = self.children.len();
        for (idx, child) in self.children.iter().enumerate() {
            let mut next_ancestors = ancestors_last.to_vec();
            if depth > 0 {
                next_ancestors.push(is_last);
            }
            let child_is_last = idx + 1 == child_count;
            child.collect_rows_inner(depth + 1, &next_ancestors, child_is_last, rows);
        }
    }
}

fn build_logical_node(plan: &LogicalPlan) -> ExplainNode {
    let mut info = Vec::new();
    match plan {
        LogicalPlan::Scan(scan) => {
            info.push(format!("table={}", scan.table_name));
            if let Some(alias) = &scan.alias {
                info.push(format!("alias={}", alias));
            }
            info.push(format!("fields=[{}]", scan.schema.column_names().join(", ")));
        }
        LogicalPlan::Calc(calc) => {
            let select = calc
                .projections
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>();
            info.push(format!("select=[{}]", select.join(", ")));
            if let Some(condition) = &calc.condition {
                info.push(format!("where={}", condition));
            }
        }
        LogicalPlan::WindowAggregate(agg) => {
            if !agg.grouping_columns.is_empty() {
                info.push(format!("group_by=[{}]", agg.grouping_columns.join(", ")));
            }
            info.push(format!("window={}", agg.window));
            if !agg.properties.is_empty() {
                info.push(format!("properties=[{}]", agg.property_names().join(", ")));
            }
            let select = agg
                .grouping_columns
                .iter()
                .cloned()
                .chain(
                    agg.aggregate_calls
                        .iter()
                        .map(|call| format!("{} AS {}", call, call.output_name)),
                )
                .collect::<Vec<_>>();
            info.push(format!("select=[{}]", select.join(", ")));
        }
    }

    let children = plan
        .input()
        .map(|input| vec![build_logical_node(input)])
        .unwrap_or_default();

    ExplainNode {
        id: plan.get_plan_name(),
        operator: plan.get_plan_type().to_string(),
        info,
        children,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, info: &[&str], children: Vec<ExplainNode>) -> ExplainNode {
        ExplainNode {
            id: id.to_string(),
            operator: id.split('_').next().unwrap_or(id).to_string(),
            info: info.iter().map(|s| s.to_string()).collect(),
            children,
        }
    }

    fn report() -> ExplainReport {
        ExplainReport {
            root: node(
                "Calc_2",
                &["select=[s]"],
                vec![node(
                    "WindowAggregate_1",
                    &["window=TumblingGroupWindow(w$, ts, 1000)"],
                    vec![node("Scan_0", &["table=T"], vec![])],
                )],
            ),
        }
    }

    #[test]
    fn topology_indents_children() {
        assert_eq!(
            report().topology_string(),
            "Calc (Calc_2) [select=[s]]\n  WindowAggregate (WindowAggregate_1) [window=TumblingGroupWindow(w$, ts, 1000)]\n    Scan (Scan_0) [table=T]"
        );
    }

    #[test]
    fn rows_use_tree_prefixes() {
        let ids: Vec<_> = report().rows().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["Calc_2", "└─WindowAggregate_1", "  └─Scan_0"]);
    }

    #[test]
    fn table_string_has_header() {
        let table = report().table_string();
        let first = table.lines().next().unwrap();
        assert!(first.starts_with("- id"));
        assert_eq!(table.lines().count(), 4);
    }

    #[test]
    fn json_nests_children() {
        let json = report().to_json();
        assert_eq!(json["id"], "Calc_2");
        assert_eq!(json["children"][0]["children"][0]["info"][0], "table=T");
    }
}
