//! Build order for pipelines that reference other pipelines

use anyhow::{bail, Result};
use std::collections::{HashMap, HashSet};

use crate::stage::StageStack;

use super::schema::PipelineDefinition;

/// Pipelines referenced anywhere in a definition's chain
fn references<'a>(
    pipeline: &PipelineDefinition,
    names: &HashMap<&'a str, &'a PipelineDefinition>,
) -> Vec<&'a str> {
    let mut refs = Vec::new();
    for element in &pipeline.stages {
        for segment in StageStack::split_key(element) {
            if let Some((name, _)) = names.get_key_value(segment.as_str()) {
                if !refs.contains(name) {
                    refs.push(*name);
                }
            }
        }
    }
    refs
}

/// Order pipelines so every referenced pipeline is built first.
///
/// Declaration order is kept where references allow it. Reference cycles
/// are reported with the full cycle path.
pub fn build_order(pipelines: &[PipelineDefinition]) -> Result<Vec<&PipelineDefinition>> {
    let names: HashMap<&str, &PipelineDefinition> =
        pipelines.iter().map(|p| (p.name.as_str(), p)).collect();

    let mut order = Vec::with_capacity(pipelines.len());
    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for pipeline in pipelines {
        if !visited.contains(pipeline.name.as_str()) {
            if let Some(cycle) = dfs_order(
                &names,
                pipeline.name.as_str(),
                &mut visited,
                &mut rec_stack,
                &mut path,
                &mut order,
            ) {
                bail!("Circular pipeline reference detected: {}", cycle.join(" -> "));
            }
        }
    }

    Ok(order)
}

/// DFS helper: post-order append, cycle path on a back edge
fn dfs_order<'a>(
    names: &HashMap<&'a str, &'a PipelineDefinition>,
    name: &'a str,
    visited: &mut HashSet<&'a str>,
    rec_stack: &mut HashSet<&'a str>,
    path: &mut Vec<&'a str>,
    order: &mut Vec<&'a PipelineDefinition>,
) -> Option<Vec<String>> {
    visited.insert(name);
    rec_stack.insert(name);
    path.push(name);

    if let Some(pipeline) = names.get(name) {
        for dep in references(pipeline, names) {
            if !visited.contains(dep) {
                if let Some(cycle) = dfs_order(names, dep, visited, rec_stack, path, order) {
                    return Some(cycle);
                }
            } else if rec_stack.contains(dep) {
                let mut cycle = vec![dep.to_string()];
                for p in path.iter().rev() {
                    cycle.push(p.to_string());
                    if *p == dep {
                        break;
                    }
                }
                cycle.reverse();
                return Some(cycle);
            }
        }
        order.push(*pipeline);
    }

    path.pop();
    rec_stack.remove(name);
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_pipeline(name: &str, stages: &[&str]) -> PipelineDefinition {
        PipelineDefinition {
            name: name.to_string(),
            stages: stages.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn names(order: &[&PipelineDefinition]) -> Vec<String> {
        order.iter().map(|p| p.name.clone()).collect()
    }

    #[test]
    fn test_declaration_order_kept() {
        let pipelines = vec![
            make_pipeline("a", &["toy", "import"]),
            make_pipeline("b", &["toy", "trim"]),
        ];
        assert_eq!(names(&build_order(&pipelines).unwrap()), vec!["a", "b"]);
    }

    #[test]
    fn test_referenced_pipeline_built_first() {
        let pipelines = vec![
            make_pipeline("assembled", &["trimmed", "assemble"]),
            make_pipeline("trimmed", &["toy", "import", "trim"]),
        ];
        assert_eq!(
            names(&build_order(&pipelines).unwrap()),
            vec!["trimmed", "assembled"]
        );
    }

    #[test]
    fn test_reference_inside_dotted_element() {
        let pipelines = vec![
            make_pipeline("mapped", &["assembled.map_bbmap"]),
            make_pipeline("assembled", &["toy", "assemble"]),
        ];
        assert_eq!(
            names(&build_order(&pipelines).unwrap()),
            vec!["assembled", "mapped"]
        );
    }

    #[test]
    fn test_detect_cycle() {
        let pipelines = vec![
            make_pipeline("a", &["c", "x"]),
            make_pipeline("b", &["a", "y"]),
            make_pipeline("c", &["b", "z"]),
        ];
        let err = build_order(&pipelines).unwrap_err().to_string();
        assert!(err.contains("Circular"));
        assert!(err.contains("a -> c -> b -> a"));
    }

    #[test]
    fn test_detect_self_reference() {
        let pipelines = vec![make_pipeline("a", &["a", "import"])];
        let err = build_order(&pipelines).unwrap_err().to_string();
        assert!(err.contains("a -> a"));
    }
}
