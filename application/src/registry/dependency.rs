//! Dependency-order resolution over declared engine dependencies.
//!
//! Depth-first traversal with three-color marking: an absent mark means
//! unvisited, `Visiting` means on the current path, `Visited` means done.
//! Reaching a `Visiting` node again is a cycle.

use super::RegistryError;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Visited,
}

struct Resolver<'a> {
    graph: &'a HashMap<String, Vec<String>>,
    marks: HashMap<&'a str, Mark>,
    path: Vec<&'a str>,
    order: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn new(graph: &'a HashMap<String, Vec<String>>) -> Self {
        Self {
            graph,
            marks: HashMap::new(),
            path: Vec::new(),
            order: Vec::new(),
        }
    }

    fn visit(&mut self, id: &'a str) -> Result<(), RegistryError> {
        match self.marks.get(id).copied() {
            Some(Mark::Visited) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = self.path.iter().position(|p| *p == id).unwrap_or(0);
                let mut cycle: Vec<String> =
                    self.path[start..].iter().map(|p| p.to_string()).collect();
                cycle.push(id.to_string());
                return Err(RegistryError::CircularDependency(cycle));
            }
            None => {}
        }

        self.marks.insert(id, Mark::Visiting);
        self.path.push(id);

        let graph = self.graph;
        if let Some(dependencies) = graph.get(id) {
            for dependency in dependencies {
                let Some((key, _)) = graph.get_key_value(dependency.as_str()) else {
                    return Err(RegistryError::MissingDependency {
                        engine: id.to_string(),
                        dependency: dependency.clone(),
                    });
                };
                self.visit(key.as_str())?;
            }
        }

        self.path.pop();
        self.marks.insert(id, Mark::Visited);
        self.order.push(id.to_string());
        Ok(())
    }
}

/// Linear order of `root`'s transitive dependencies, ending with `root`.
pub(crate) fn resolve(
    graph: &HashMap<String, Vec<String>>,
    root: &str,
) -> Result<Vec<String>, RegistryError> {
    resolve_all(graph, [root])
}

/// Combined order for several roots; each node appears once.
pub(crate) fn resolve_all<'r, I>(
    graph: &HashMap<String, Vec<String>>,
    roots: I,
) -> Result<Vec<String>, RegistryError>
where
    I: IntoIterator<Item = &'r str>,
{
    let mut resolver = Resolver::new(graph);
    for root in roots {
        let Some((key, _)) = graph.get_key_value(root) else {
            return Err(RegistryError::NotFound(root.to_string()));
        };
        resolver.visit(key.as_str())?;
    }
    Ok(resolver.order)
}
