use std::collections::HashMap;

use crate::conversion::{Circle, UnitConversion};
use crate::graph::circuits::elementary_circuits;
use crate::graph::{Graph, VertexId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartitionLabel {
    /// Text rules for one ingredient plus every regex rule.
    Ingredient(String),
    /// Regex rules only.
    RegexOnly,
}

impl std::fmt::Display for PartitionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ingredient(name) => write!(f, "{name}"),
            Self::RegexOnly => write!(f, "<regex rules>"),
        }
    }
}

/// A group of conversions that may chain into each other, plus their chain graph.
///
/// Vertex `i` of the graph is `conversions[i]`; an edge `u -> v` means the destination
/// unit of `u` is the source unit of `v`.
#[derive(Debug, Clone)]
pub struct Partition {
    label: PartitionLabel,
    conversions: Vec<UnitConversion>,
    graph: Graph,
}

impl Partition {
    pub fn new(label: PartitionLabel, conversions: Vec<UnitConversion>) -> Self {
        let mut by_source: HashMap<&str, Vec<VertexId>> = HashMap::new();
        for (i, conversion) in conversions.iter().enumerate() {
            by_source
                .entry(conversion.source_unit())
                .or_default()
                .push(VertexId::new(i));
        }

        let rows = conversions
            .iter()
            .map(|conversion| {
                by_source
                    .get(conversion.destination_unit())
                    .cloned()
                    .unwrap_or_default()
            })
            .collect();
        let graph = Graph::from_adjacency(rows);

        Self {
            label,
            conversions,
            graph,
        }
    }

    pub fn label(&self) -> &PartitionLabel {
        &self.label
    }

    pub fn conversions(&self) -> &[UnitConversion] {
        &self.conversions
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Circles in this partition. An ingredient partition skips circles made only of
    /// regex rules; those belong to the regex-only partition.
    pub fn find_circles(&self) -> Vec<Circle> {
        let circles: Vec<Circle> = elementary_circuits(&self.graph)
            .into_iter()
            .map(|circuit| {
                Circle::new(
                    circuit
                        .into_iter()
                        .map(|v| self.conversions[v.index()].clone())
                        .collect(),
                )
            })
            .filter(|circle| {
                self.label == PartitionLabel::RegexOnly
                    || !circle.iter().all(UnitConversion::is_regex)
            })
            .collect();

        log::debug!(
            "partition {}: {} conversions, {} chain edges, {} circles",
            self.label,
            self.conversions.len(),
            self.graph.edge_count(),
            circles.len()
        );
        circles
    }
}

/// Splits a rule set into independent partitions: one per ingredient named by a text rule
/// (in order of first appearance), then one holding only the regex rules.
#[derive(Debug, Clone)]
pub struct ConversionPartitioner {
    partitions: Vec<Partition>,
}

impl ConversionPartitioner {
    pub fn new(conversions: &[UnitConversion]) -> Self {
        let regex: Vec<UnitConversion> = conversions
            .iter()
            .filter(|c| c.is_regex())
            .cloned()
            .collect();

        let mut index_by_ingredient: HashMap<&str, usize> = HashMap::new();
        let mut text_groups: Vec<(String, Vec<UnitConversion>)> = Vec::new();
        for conversion in conversions {
            let UnitConversion::Text(text) = conversion else {
                continue;
            };
            let index = *index_by_ingredient
                .entry(text.ingredient.as_str())
                .or_insert_with(|| {
                    text_groups.push((text.ingredient.clone(), Vec::new()));
                    text_groups.len() - 1
                });
            text_groups[index].1.push(conversion.clone());
        }

        let mut partitions: Vec<Partition> = text_groups
            .into_iter()
            .map(|(ingredient, mut members)| {
                members.extend(regex.iter().cloned());
                Partition::new(PartitionLabel::Ingredient(ingredient), members)
            })
            .collect();
        partitions.push(Partition::new(PartitionLabel::RegexOnly, regex));

        Self { partitions }
    }

    pub fn partitions(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn find_circles(&self) -> Vec<Circle> {
        self.partitions
            .iter()
            .flat_map(Partition::find_circles)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_empty_input_yields_empty_regex_partition() {
        let partitioner = ConversionPartitioner::new(&[]);
        let partitions = partitioner.partitions();

        assert_eq!(partitions.len(), 1);
        assert_eq!(partitions[0].label(), &PartitionLabel::RegexOnly);
        assert!(partitions[0].graph().is_empty());
        assert!(partitioner.find_circles().is_empty());
    }

    #[test]
    fn test_regex_rules_replicated_into_every_text_partition() {
        let conversions = vec![
            UnitConversion::text("Mehl", "kg", "g", 1000),
            UnitConversion::regex(".*", "EL", "g", 15),
            UnitConversion::text("Zucker", "Pck", "g", 500),
            UnitConversion::text("Mehl", "g", "Pck", Decimal::new(1, 3)),
        ];
        let partitioner = ConversionPartitioner::new(&conversions);
        let partitions = partitioner.partitions();

        let labels: Vec<String> = partitions.iter().map(|p| p.label().to_string()).collect();
        assert_eq!(labels, ["Mehl", "Zucker", "<regex rules>"]);

        assert_eq!(
            partitions[0].conversions(),
            &[
                conversions[0].clone(),
                conversions[3].clone(),
                conversions[1].clone()
            ]
        );
        assert_eq!(
            partitions[1].conversions(),
            &[conversions[2].clone(), conversions[1].clone()]
        );
        assert_eq!(partitions[2].conversions(), &[conversions[1].clone()]);
    }

    #[test]
    fn test_chain_edges() {
        let partition = Partition::new(
            PartitionLabel::Ingredient("Mehl".into()),
            vec![
                UnitConversion::text("Mehl", "kg", "g", 1000),
                UnitConversion::text("Mehl", "g", "Pck", Decimal::new(1, 3)),
                UnitConversion::regex(".*", "EL", "g", 15),
            ],
        );
        let graph = partition.graph();

        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.has_edge(VertexId(0), VertexId(1))); // kg->g then g->Pck
        assert!(graph.has_edge(VertexId(2), VertexId(1))); // EL->g then g->Pck
        assert!(partition.find_circles().is_empty());
    }

    #[test]
    fn test_regex_only_circle_reported_once() {
        let conversions = vec![
            UnitConversion::regex(".*", "kg", "g", 1000),
            UnitConversion::regex(".*", "g", "kg", Decimal::new(1, 3)),
            UnitConversion::text("Mehl", "Pck", "g", 500),
            UnitConversion::text("Zucker", "EL", "g", 15),
        ];
        let circles = ConversionPartitioner::new(&conversions).find_circles();

        assert_eq!(circles.len(), 1);
        assert_eq!(
            circles[0],
            Circle::new(vec![conversions[0].clone(), conversions[1].clone()])
        );
    }

    #[test]
    fn test_mixed_circle_belongs_to_its_ingredient() {
        let conversions = vec![
            UnitConversion::text("Mehl", "Pck", "kg", Decimal::new(5, 1)),
            UnitConversion::regex(".*", "kg", "Pck", 2),
            UnitConversion::text("Zucker", "Pck", "g", 500),
        ];
        let circles = ConversionPartitioner::new(&conversions).find_circles();

        assert_eq!(circles.len(), 1);
        assert!(circles[0].contains(&conversions[0]));
        assert!(circles[0].contains(&conversions[1]));
    }
}
