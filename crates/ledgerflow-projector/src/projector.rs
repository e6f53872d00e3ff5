use std::pin::pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use ledgerflow_config::{EdgePolicy, ProjectionConfig};
use ledgerflow_graph::{Graph, GraphClassifier, Position, StateRecord, TransitionRecord};
use ledgerflow_ledger::{LedgerReader, RawValue};

use crate::error::ProjectError;
use crate::events::{NoopNotifier, ProjectionEvent, ProjectionNotifier};

/// Outcome of a completed projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectionSummary {
  /// Counter read from the state count field.
  pub state_count: u64,
  /// Counter read from the transition count field.
  pub transition_count: u64,
  pub nodes: usize,
  pub edges: usize,
  /// Edges whose source or target is not a node.
  pub dangling_edges: usize,
}

/// Projector fills a graph from an external source.
#[async_trait]
pub trait Projector: Send + Sync {
  /// Populate `graph` and classify it.
  ///
  /// On error the graph keeps whatever was appended before the failure and
  /// is left unclassified.
  async fn project(&self, graph: &mut Graph) -> Result<ProjectionSummary, ProjectError>;
}

/// Projects the state machine stored in a ledger record store.
///
/// The two counters are read concurrently. States and then transitions are
/// read one index at a time, each read awaited before the next is issued, so
/// node placement follows fetch order.
pub struct WorkflowProjector<L: LedgerReader> {
  ledger: L,
  config: ProjectionConfig,
  classifier: GraphClassifier,
  notifier: Arc<dyn ProjectionNotifier>,
}

impl<L: LedgerReader> WorkflowProjector<L> {
  /// Create a projector that emits no events.
  pub fn new(ledger: L, config: ProjectionConfig) -> Self {
    Self::with_notifier(ledger, config, Arc::new(NoopNotifier))
  }

  /// Create a projector that reports progress to `notifier`.
  pub fn with_notifier(
    ledger: L,
    config: ProjectionConfig,
    notifier: Arc<dyn ProjectionNotifier>,
  ) -> Self {
    Self {
      ledger,
      config,
      classifier: GraphClassifier::new(),
      notifier,
    }
  }

  pub fn config(&self) -> &ProjectionConfig {
    &self.config
  }

  /// Read one field, attaching the call to any failure.
  async fn read(&self, field: &str, index: Option<u64>) -> Result<Vec<RawValue>, ProjectError> {
    let call = call_name(field, index);
    let args: Vec<RawValue> = index.map(RawValue::Uint).into_iter().collect();

    debug!(call = %call, "reading ledger field");
    self
      .ledger
      .read_field(field, &args)
      .await
      .map_err(|source| ProjectError::Ledger { call, source })
  }

  async fn read_count(&self, field: &str) -> Result<u64, ProjectError> {
    let tuple = self.read(field, None).await?;
    let value = tuple
      .first()
      .ok_or_else(|| malformed(field, None, "empty result"))?;
    value
      .as_count()
      .map_err(|e| malformed(field, None, e.to_string()))
  }

  async fn fetch_state(&self, index: u64) -> Result<StateRecord, ProjectError> {
    let field = self.config.fields.states.as_str();
    let tuple = self.read(field, Some(index)).await?;
    let label = tuple
      .first()
      .ok_or_else(|| malformed(field, Some(index), "empty result"))?;

    Ok(StateRecord::new(index, label.as_label()))
  }

  async fn fetch_transition(&self, index: u64) -> Result<TransitionRecord, ProjectError> {
    let field = self.config.fields.transitions.as_str();
    let tuple = self.read(field, Some(index)).await?;

    let [label, source, target, flag, ..] = tuple.as_slice() else {
      return Err(malformed(
        field,
        Some(index),
        format!("expected 4 values, got {}", tuple.len()),
      ));
    };
    let endpoint = |value: &RawValue| {
      value
        .as_id()
        .map_err(|e| malformed(field, Some(index), e.to_string()))
    };

    Ok(TransitionRecord::new(
      index,
      label.as_label(),
      endpoint(source)?,
      endpoint(target)?,
      flag.is_truthy(),
    ))
  }

  /// Lazy, in-order sequence of state records.
  fn states(
    &self,
    count: u64,
  ) -> impl Stream<Item = Result<StateRecord, ProjectError>> + Send + '_ {
    stream::iter(self.config.loop_bound.indices(count)).then(move |index| self.fetch_state(index))
  }

  /// Lazy, in-order sequence of transition records.
  fn transitions(
    &self,
    count: u64,
  ) -> impl Stream<Item = Result<TransitionRecord, ProjectError>> + Send + '_ {
    stream::iter(self.config.loop_bound.indices(count))
      .then(move |index| self.fetch_transition(index))
  }

  /// Fill the graph. Returns the two counters.
  async fn populate(&self, graph: &mut Graph) -> Result<(u64, u64), ProjectError> {
    let fields = &self.config.fields;
    let (state_count, transition_count) = futures::try_join!(
      self.read_count(&fields.state_count),
      self.read_count(&fields.transition_count)
    )?;

    info!(state_count, transition_count, "fetched record counts");
    self.notifier.notify(ProjectionEvent::CountsFetched {
      state_count,
      transition_count,
    });

    let mut states = pin!(self.states(state_count));
    let mut slot = 0;
    while let Some(record) = states.try_next().await? {
      let position = Position::from(self.config.layout.slot(slot));
      slot += 1;

      let node = graph.push_node(record, position)?;
      debug!(node_id = %node.id(), label = %node.label(), "added node");
      self.notifier.notify(ProjectionEvent::NodeAdded {
        node_id: node.id().to_string(),
      });
    }

    let mut transitions = pin!(self.transitions(transition_count));
    while let Some(record) = transitions.try_next().await? {
      if let Err(e) = graph.check_endpoints(&record) {
        match self.config.edge_policy {
          EdgePolicy::Strict => return Err(e.into()),
          EdgePolicy::Permissive => warn!(error = %e, "keeping edge with unknown endpoint"),
        }
      }

      let edge = graph.push_edge(record)?;
      debug!(
        edge_id = %edge.id(),
        source = %edge.source_id(),
        target = %edge.target_id(),
        "added edge"
      );
      self.notifier.notify(ProjectionEvent::EdgeAdded {
        edge_id: edge.id().to_string(),
      });
    }

    Ok((state_count, transition_count))
  }
}

#[async_trait]
impl<L: LedgerReader> Projector for WorkflowProjector<L> {
  #[instrument(name = "workflow_project", skip(self, graph))]
  async fn project(&self, graph: &mut Graph) -> Result<ProjectionSummary, ProjectError> {
    info!(
      loop_bound = ?self.config.loop_bound,
      edge_policy = ?self.config.edge_policy,
      "projection_started"
    );
    self.notifier.notify(ProjectionEvent::Started);

    let (state_count, transition_count) = match self.populate(graph).await {
      Ok(counts) => counts,
      Err(e) => {
        error!(
          error = %e,
          nodes = graph.nodes().len(),
          edges = graph.edges().len(),
          "projection_failed"
        );
        self.notifier.notify(ProjectionEvent::Failed {
          error: e.to_string(),
        });
        return Err(e);
      }
    };

    self.classifier.classify(graph);

    let summary = ProjectionSummary {
      state_count,
      transition_count,
      nodes: graph.nodes().len(),
      edges: graph.edges().len(),
      dangling_edges: graph.dangling_edges().len(),
    };
    info!(
      nodes = summary.nodes,
      edges = summary.edges,
      dangling_edges = summary.dangling_edges,
      "projection_ready"
    );
    self.notifier.notify(ProjectionEvent::Ready {
      nodes: summary.nodes,
      edges: summary.edges,
    });

    Ok(summary)
  }
}

fn call_name(field: &str, index: Option<u64>) -> String {
  match index {
    Some(i) => format!("{}({})", field, i),
    None => format!("{}()", field),
  }
}

fn malformed(field: &str, index: Option<u64>, reason: impl Into<String>) -> ProjectError {
  ProjectError::MalformedRecord {
    call: call_name(field, index),
    reason: reason.into(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use ledgerflow_config::LoopBound;
  use ledgerflow_graph::{GraphError, NodeRole};
  use ledgerflow_ledger::LedgerError;
  use std::collections::HashMap;
  use std::sync::Mutex;

  /// Mock ledger that records every call it receives.
  #[derive(Default)]
  struct MockLedger {
    scalars: HashMap<String, Vec<RawValue>>,
    tables: HashMap<(String, u64), Vec<RawValue>>,
    fail_on: Option<String>,
    calls: Mutex<Vec<String>>,
  }

  impl MockLedger {
    fn new(state_count: u64, transition_count: u64) -> Self {
      let mut ledger = Self::default();
      ledger
        .scalars
        .insert("stateIndex".to_string(), vec![RawValue::Uint(state_count)]);
      ledger.scalars.insert(
        "transitionIndex".to_string(),
        vec![RawValue::Uint(transition_count)],
      );
      ledger
    }

    fn state(mut self, index: u64, label: &str) -> Self {
      self
        .tables
        .insert(("states".to_string(), index), vec![RawValue::from(label)]);
      self
    }

    fn transition(mut self, index: u64, tuple: Vec<RawValue>) -> Self {
      self.tables.insert(("transitions".to_string(), index), tuple);
      self
    }

    fn failing_on(mut self, call: &str) -> Self {
      self.fail_on = Some(call.to_string());
      self
    }

    fn calls(&self) -> Vec<String> {
      self.calls.lock().unwrap().clone()
    }
  }

  #[async_trait]
  impl LedgerReader for MockLedger {
    async fn read_field(
      &self,
      field: &str,
      args: &[RawValue],
    ) -> Result<Vec<RawValue>, LedgerError> {
      let index = args.first().map(|a| a.as_count().unwrap());
      let call = call_name(field, index);
      self.calls.lock().unwrap().push(call.clone());

      if self.fail_on.as_deref() == Some(call.as_str()) {
        return Err(LedgerError::Transport("execution reverted".to_string()));
      }

      let tuple = match index {
        None => self.scalars.get(field).cloned(),
        Some(i) => self.tables.get(&(field.to_string(), i)).cloned(),
      };
      tuple.ok_or_else(|| LedgerError::FieldNotFound(call))
    }
  }

  /// Collects events for assertions.
  #[derive(Default)]
  struct RecordingNotifier {
    events: Mutex<Vec<ProjectionEvent>>,
  }

  impl ProjectionNotifier for RecordingNotifier {
    fn notify(&self, event: ProjectionEvent) {
      self.events.lock().unwrap().push(event);
    }
  }

  fn transition(label: &str, source: u64, target: u64, flag: bool) -> Vec<RawValue> {
    vec![
      RawValue::from(label),
      RawValue::Uint(source),
      RawValue::Uint(target),
      RawValue::Bool(flag),
    ]
  }

  fn two_state_ledger() -> MockLedger {
    MockLedger::new(3, 2)
      .state(1, "Draft")
      .state(2, "Published")
      .transition(1, transition("go", 1, 2, true))
  }

  #[tokio::test]
  async fn test_project_two_states_one_transition() {
    let projector = WorkflowProjector::new(two_state_ledger(), ProjectionConfig::default());
    let mut graph = Graph::new();

    let summary = projector.project(&mut graph).await.unwrap();

    assert_eq!(summary.state_count, 3);
    assert_eq!(summary.transition_count, 2);
    assert_eq!(summary.nodes, 2);
    assert_eq!(summary.edges, 1);
    assert_eq!(summary.dangling_edges, 0);

    let ids: Vec<&str> = graph.nodes().iter().map(|n| n.id()).collect();
    assert_eq!(ids, vec!["1", "2"]);
    assert_eq!(graph.node("1").unwrap().label(), "Draft");

    let edge = graph.edge("1").unwrap();
    assert_eq!(edge.label(), "go");
    assert_eq!(edge.source_id(), "1");
    assert_eq!(edge.target_id(), "2");
    assert!(edge.animated());

    assert_eq!(graph.node("1").unwrap().role, NodeRole::Input);
    assert_eq!(graph.node("2").unwrap().role, NodeRole::Output);
  }

  #[tokio::test]
  async fn test_nodes_are_stacked_in_fetch_order() {
    let ledger = MockLedger::new(4, 0)
      .state(1, "A")
      .state(2, "B")
      .state(3, "C");
    let projector = WorkflowProjector::new(ledger, ProjectionConfig::default());
    let mut graph = Graph::new();

    projector.project(&mut graph).await.unwrap();

    let positions: Vec<(f64, f64)> = graph
      .nodes()
      .iter()
      .map(|n| (n.position.x, n.position.y))
      .collect();
    assert_eq!(positions, vec![(250.0, 150.0), (250.0, 250.0), (250.0, 350.0)]);
  }

  #[tokio::test]
  async fn test_records_are_read_one_at_a_time_in_order() {
    let ledger = Arc::new(
      MockLedger::new(3, 3)
        .state(1, "A")
        .state(2, "B")
        .transition(1, transition("t1", 1, 2, false))
        .transition(2, transition("t2", 2, 1, false)),
    );
    let projector = WorkflowProjector::new(ledger.clone(), ProjectionConfig::default());
    let mut graph = Graph::new();

    projector.project(&mut graph).await.unwrap();

    let calls = ledger.calls();
    let mut counts = calls[..2].to_vec();
    counts.sort();
    assert_eq!(counts, vec!["stateIndex()", "transitionIndex()"]);
    assert_eq!(
      &calls[2..],
      &["states(1)", "states(2)", "transitions(1)", "transitions(2)"]
    );
  }

  #[tokio::test]
  async fn test_small_counts_yield_empty_graph() {
    for (states, transitions) in [(0, 0), (1, 1), (0, 1), (1, 0)] {
      let ledger = Arc::new(MockLedger::new(states, transitions));
      let notifier = Arc::new(RecordingNotifier::default());
      let projector =
        WorkflowProjector::with_notifier(ledger.clone(), ProjectionConfig::default(), notifier.clone());
      let mut graph = Graph::new();

      let summary = projector.project(&mut graph).await.unwrap();

      assert!(graph.is_empty());
      assert_eq!(summary.nodes, 0);
      assert_eq!(ledger.calls().len(), 2);
      assert_eq!(
        notifier.events.lock().unwrap().last(),
        Some(&ProjectionEvent::Ready { nodes: 0, edges: 0 })
      );
    }
  }

  #[tokio::test]
  async fn test_negative_count_yields_nothing() {
    let mut ledger = MockLedger::new(0, 0);
    ledger
      .scalars
      .insert("stateIndex".to_string(), vec![RawValue::Int(-3)]);
    let projector = WorkflowProjector::new(ledger, ProjectionConfig::default());
    let mut graph = Graph::new();

    projector.project(&mut graph).await.unwrap();
    assert!(graph.is_empty());
  }

  #[tokio::test]
  async fn test_first_state_failure_leaves_graph_empty() {
    let ledger = two_state_ledger().failing_on("states(1)");
    let notifier = Arc::new(RecordingNotifier::default());
    let projector =
      WorkflowProjector::with_notifier(ledger, ProjectionConfig::default(), notifier.clone());
    let mut graph = Graph::new();

    let result = projector.project(&mut graph).await;

    match result {
      Err(ProjectError::Ledger { call, source }) => {
        assert_eq!(call, "states(1)");
        assert!(matches!(source, LedgerError::Transport(_)));
      }
      other => panic!("expected ledger error, got {:?}", other),
    }
    assert!(graph.is_empty());

    let events = notifier.events.lock().unwrap();
    assert!(!events.iter().any(|e| matches!(e, ProjectionEvent::Ready { .. })));
    assert!(matches!(events.last(), Some(ProjectionEvent::Failed { .. })));
  }

  #[tokio::test]
  async fn test_midway_failure_keeps_partial_unclassified_graph() {
    let ledger = two_state_ledger().failing_on("transitions(1)");
    let projector = WorkflowProjector::new(ledger, ProjectionConfig::default());
    let mut graph = Graph::new();

    assert!(projector.project(&mut graph).await.is_err());

    assert_eq!(graph.nodes().len(), 2);
    assert!(graph.edges().is_empty());
    assert!(graph.nodes().iter().all(|n| n.role == NodeRole::Default));
  }

  #[tokio::test]
  async fn test_count_failure_fetches_no_records() {
    let ledger = Arc::new(two_state_ledger().failing_on("transitionIndex()"));
    let projector = WorkflowProjector::new(ledger.clone(), ProjectionConfig::default());
    let mut graph = Graph::new();

    assert!(projector.project(&mut graph).await.is_err());
    assert!(graph.is_empty());
    assert!(!ledger.calls().iter().any(|c| c.starts_with("states(")));
  }

  #[tokio::test]
  async fn test_inclusive_bound_reads_last_record() {
    let ledger = MockLedger::new(2, 1)
      .state(1, "A")
      .state(2, "B")
      .transition(1, transition("t", 1, 2, false));
    let config = ProjectionConfig {
      loop_bound: LoopBound::Inclusive,
      ..Default::default()
    };
    let projector = WorkflowProjector::new(ledger, config);
    let mut graph = Graph::new();

    let summary = projector.project(&mut graph).await.unwrap();
    assert_eq!(summary.nodes, 2);
    assert_eq!(summary.edges, 1);
  }

  #[tokio::test]
  async fn test_permissive_policy_keeps_dangling_edge() {
    let ledger = MockLedger::new(2, 2)
      .state(1, "A")
      .transition(1, transition("t", 1, 5, false));
    let projector = WorkflowProjector::new(ledger, ProjectionConfig::default());
    let mut graph = Graph::new();

    let summary = projector.project(&mut graph).await.unwrap();
    assert_eq!(summary.edges, 1);
    assert_eq!(summary.dangling_edges, 1);
    assert_eq!(graph.node("1").unwrap().role, NodeRole::Input);
  }

  #[tokio::test]
  async fn test_strict_policy_rejects_dangling_edge() {
    let ledger = MockLedger::new(2, 2)
      .state(1, "A")
      .transition(1, transition("t", 1, 5, false));
    let config = ProjectionConfig {
      edge_policy: EdgePolicy::Strict,
      ..Default::default()
    };
    let projector = WorkflowProjector::new(ledger, config);
    let mut graph = Graph::new();

    let result = projector.project(&mut graph).await;
    assert!(matches!(
      result,
      Err(ProjectError::Graph(GraphError::DanglingEdge { .. }))
    ));
    assert!(graph.edges().is_empty());
  }

  #[tokio::test]
  async fn test_short_transition_tuple_is_malformed() {
    let ledger = MockLedger::new(2, 2)
      .state(1, "A")
      .transition(1, vec![RawValue::from("t"), RawValue::Uint(1)]);
    let projector = WorkflowProjector::new(ledger, ProjectionConfig::default());
    let mut graph = Graph::new();

    let result = projector.project(&mut graph).await;
    match result {
      Err(ProjectError::MalformedRecord { call, reason }) => {
        assert_eq!(call, "transitions(1)");
        assert_eq!(reason, "expected 4 values, got 2");
      }
      other => panic!("expected malformed record, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_non_numeric_endpoint_is_malformed() {
    let ledger = MockLedger::new(2, 2).state(1, "A").transition(
      1,
      vec![
        RawValue::from("t"),
        RawValue::from("start"),
        RawValue::Uint(1),
        RawValue::Bool(false),
      ],
    );
    let projector = WorkflowProjector::new(ledger, ProjectionConfig::default());
    let mut graph = Graph::new();

    let result = projector.project(&mut graph).await;
    assert!(matches!(result, Err(ProjectError::MalformedRecord { .. })));
  }

  #[tokio::test]
  async fn test_flag_truthiness_and_text_ids() {
    let ledger = MockLedger::new(3, 2)
      .state(1, "A")
      .state(2, "B")
      .transition(
        1,
        vec![
          RawValue::from("t"),
          RawValue::from("01"),
          RawValue::from("2"),
          RawValue::Uint(0),
        ],
      );
    let projector = WorkflowProjector::new(ledger, ProjectionConfig::default());
    let mut graph = Graph::new();

    projector.project(&mut graph).await.unwrap();

    let edge = graph.edge("1").unwrap();
    assert_eq!(edge.source_id(), "1");
    assert!(!edge.animated());
    assert_eq!(graph.node("1").unwrap().role, NodeRole::Input);
  }

  #[tokio::test]
  async fn test_custom_field_names() {
    let mut ledger = MockLedger::default();
    ledger
      .scalars
      .insert("stateCount".to_string(), vec![RawValue::Uint(2)]);
    ledger
      .scalars
      .insert("transitionCount".to_string(), vec![RawValue::Uint(0)]);
    ledger
      .tables
      .insert(("stateAt".to_string(), 1), vec![RawValue::from("Only")]);

    let mut config = ProjectionConfig::default();
    config.fields.state_count = "stateCount".to_string();
    config.fields.transition_count = "transitionCount".to_string();
    config.fields.states = "stateAt".to_string();

    let projector = WorkflowProjector::new(ledger, config);
    let mut graph = Graph::new();

    projector.project(&mut graph).await.unwrap();
    assert_eq!(graph.node("1").unwrap().label(), "Only");
    assert_eq!(graph.node("1").unwrap().role, NodeRole::Output);
  }

  #[tokio::test]
  async fn test_events_follow_projection_order() {
    let notifier = Arc::new(RecordingNotifier::default());
    let projector = WorkflowProjector::with_notifier(
      two_state_ledger(),
      ProjectionConfig::default(),
      notifier.clone(),
    );
    let mut graph = Graph::new();

    projector.project(&mut graph).await.unwrap();

    let events = notifier.events.lock().unwrap();
    assert_eq!(
      *events,
      vec![
        ProjectionEvent::Started,
        ProjectionEvent::CountsFetched {
          state_count: 3,
          transition_count: 2,
        },
        ProjectionEvent::NodeAdded {
          node_id: "1".to_string()
        },
        ProjectionEvent::NodeAdded {
          node_id: "2".to_string()
        },
        ProjectionEvent::EdgeAdded {
          edge_id: "1".to_string()
        },
        ProjectionEvent::Ready { nodes: 2, edges: 1 },
      ]
    );
  }
}
