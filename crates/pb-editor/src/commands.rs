//! Undo/Redo command stack.
//!
//! Every applied mutation is recorded with its inverse. Gesture-scoped
//! edits (e.g. dropping a node and immediately connecting it) are grouped
//! with `begin_batch`/`end_batch` into one atomic undo step: undo replays
//! the inverses in reverse order, redo replays the forwards in order.

use crate::engine::{EditEngine, GraphMutation};

/// A command on the undo stack.
#[derive(Debug, Clone)]
pub enum Command {
    /// Single mutation with its inverse.
    Single {
        forward: Box<GraphMutation>,
        inverse: Box<GraphMutation>,
        description: String,
    },
    /// A gesture's worth of (forward, inverse) pairs, applied atomically.
    Batch {
        steps: Vec<(GraphMutation, GraphMutation)>,
        description: String,
    },
}

impl Command {
    pub fn description(&self) -> &str {
        match self {
            Command::Single { description, .. } | Command::Batch { description, .. } => {
                description
            }
        }
    }
}

/// Manages undo/redo stacks with batch grouping for gestures.
pub struct CommandStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    /// Maximum undo depth.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Steps collected during the current batch.
    batch_steps: Vec<(GraphMutation, GraphMutation)>,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: Vec::with_capacity(max_depth),
            redo_stack: Vec::new(),
            max_depth,
            batch_depth: 0,
            batch_steps: Vec::new(),
        }
    }

    /// Start a batch group. All mutations until `end_batch()` are applied
    /// live but tracked as one atomic undo step.
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
    }

    /// End a batch group. When the outermost batch closes, push one batch
    /// command to the undo stack if any mutations occurred.
    pub fn end_batch(&mut self, description: &str) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 && !self.batch_steps.is_empty() {
            let cmd = Command::Batch {
                steps: std::mem::take(&mut self.batch_steps),
                description: description.to_string(),
            };
            self.push(cmd);
        }
    }

    /// Apply a mutation via the engine and record it for undo.
    /// No-op mutations (missing targets) are not recorded.
    pub fn execute(&mut self, engine: &mut EditEngine, mutation: GraphMutation, description: &str) {
        let forward = mutation.clone();
        let Some(inverse) = engine.apply_mutation(mutation) else {
            return;
        };

        if self.batch_depth > 0 {
            self.batch_steps.push((forward, inverse));
            return;
        }

        self.push(Command::Single {
            forward: Box::new(forward),
            inverse: Box::new(inverse),
            description: description.to_string(),
        });
    }

    /// Undo the most recent command. Returns true if anything was undone.
    pub fn undo(&mut self, engine: &mut EditEngine) -> bool {
        let Some(cmd) = self.undo_stack.pop() else {
            return false;
        };
        match &cmd {
            Command::Single { inverse, .. } => {
                engine.apply_mutation((**inverse).clone());
            }
            Command::Batch { steps, .. } => {
                for (_, inverse) in steps.iter().rev() {
                    engine.apply_mutation(inverse.clone());
                }
            }
        }
        self.redo_stack.push(cmd);
        true
    }

    /// Redo the most recently undone command. Returns true if anything
    /// was redone.
    pub fn redo(&mut self, engine: &mut EditEngine) -> bool {
        let Some(cmd) = self.redo_stack.pop() else {
            return false;
        };
        match &cmd {
            Command::Single { forward, .. } => {
                engine.apply_mutation((**forward).clone());
            }
            Command::Batch { steps, .. } => {
                for (forward, _) in steps {
                    engine.apply_mutation(forward.clone());
                }
            }
        }
        self.undo_stack.push(cmd);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn push(&mut self, cmd: Command) {
        self.undo_stack.push(cmd);
        if self.undo_stack.len() > self.max_depth {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pb_core::palette::{TypeDefinition, TypeSchema};
    use pb_core::project::{CanvasNode, Link, NodeKind};
    use pb_core::{Name, Palette};
    use pretty_assertions::assert_eq;

    fn engine() -> EditEngine {
        let palette = Palette::new(vec![TypeDefinition::with_schema(
            Name::intern("Thing"),
            TypeSchema::new(Name::intern("Thing")),
        )]);
        EditEngine::new(palette)
    }

    fn add_node(id: &str) -> GraphMutation {
        GraphMutation::AddNode {
            parent_id: Name::intern("root"),
            node: CanvasNode::new(Name::intern(id), Name::intern("Thing"), NodeKind::Element),
        }
    }

    #[test]
    fn undo_redo_roundtrip() {
        let mut engine = engine();
        let mut stack = CommandStack::new(16);

        stack.execute(&mut engine, add_node("a"), "drop node");
        assert!(engine.graph.get_by_id(Name::intern("a")).is_some());

        assert!(stack.undo(&mut engine));
        assert!(engine.graph.get_by_id(Name::intern("a")).is_none());

        assert!(stack.redo(&mut engine));
        assert!(engine.graph.get_by_id(Name::intern("a")).is_some());
    }

    #[test]
    fn batch_undoes_as_one_step() {
        let mut engine = engine();
        let mut stack = CommandStack::new(16);
        let a = Name::intern("a");
        let b = Name::intern("b");

        stack.begin_batch();
        stack.execute(&mut engine, add_node("a"), "");
        stack.execute(&mut engine, add_node("b"), "");
        stack.execute(
            &mut engine,
            GraphMutation::AddLink {
                link: Link::with_label(a, b, "relates to"),
            },
            "",
        );
        stack.end_batch("drop and connect");

        assert_eq!(engine.graph.links.len(), 1);

        // One undo reverts the whole gesture, inverses in reverse order.
        assert!(stack.undo(&mut engine));
        assert!(engine.graph.get_by_id(a).is_none());
        assert!(engine.graph.get_by_id(b).is_none());
        assert!(engine.graph.links.is_empty());
        assert!(!stack.can_undo());

        assert!(stack.redo(&mut engine));
        assert!(engine.graph.get_by_id(a).is_some());
        assert_eq!(engine.graph.links.len(), 1);
    }

    #[test]
    fn new_edits_clear_the_redo_stack() {
        let mut engine = engine();
        let mut stack = CommandStack::new(16);

        stack.execute(&mut engine, add_node("a"), "drop a");
        stack.undo(&mut engine);
        assert!(stack.can_redo());

        stack.execute(&mut engine, add_node("b"), "drop b");
        assert!(!stack.can_redo());
    }

    #[test]
    fn depth_is_bounded() {
        let mut engine = engine();
        let mut stack = CommandStack::new(2);

        stack.execute(&mut engine, add_node("a"), "");
        stack.execute(&mut engine, add_node("b"), "");
        stack.execute(&mut engine, add_node("c"), "");

        // Oldest command fell off: only two undos possible.
        assert!(stack.undo(&mut engine));
        assert!(stack.undo(&mut engine));
        assert!(!stack.undo(&mut engine));
        assert!(engine.graph.get_by_id(Name::intern("a")).is_some());
    }

    #[test]
    fn empty_batch_pushes_nothing() {
        let mut engine = engine();
        let mut stack = CommandStack::new(16);

        stack.begin_batch();
        stack.end_batch("nothing happened");
        assert!(!stack.can_undo());
    }
}
