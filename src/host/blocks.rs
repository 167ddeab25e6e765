//! The root of a UI tree and its event listeners.

use std::fmt;

use indexmap::IndexMap;

use super::block::Block;
use super::request::Request;
use super::types::{
    BlockId,
    HostError,
    PropValue,
    Update,
};

/// Computes the value of an output block when a page loads.
pub type LoadHandler = Box<dyn Fn(&Request) -> PropValue>;

/// Computes one update per output block when an input value changes.
pub type ChangeHandler = Box<dyn Fn(&PropValue) -> Vec<Update>>;

/// A listener fired on page load.
struct LoadListener {
    /// Block whose value is replaced by the handler's result.
    output: BlockId,
    /// Handler.
    handler: LoadHandler,
}

/// A listener fired when the value of `input` changes.
struct ChangeListener {
    /// Watched block.
    input: BlockId,
    /// Blocks updated positionally from the handler's result.
    outputs: Vec<BlockId>,
    /// Handler.
    handler: ChangeHandler,
}

/// A UI tree plus hidden state slots and event wiring.
///
/// Listeners run synchronously. Updates written by a change listener do not
/// trigger further listeners.
pub struct Blocks {
    /// Root container.
    root: Block,
    /// Hidden values that are not part of the rendered tree.
    states: IndexMap<BlockId, PropValue>,
    /// Page load listeners.
    load_listeners: Vec<LoadListener>,
    /// Value change listeners.
    change_listeners: Vec<ChangeListener>,
}

impl Default for Blocks {
    fn default() -> Self {
        Self::new()
    }
}

impl Blocks {
    /// Creates an empty app.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Block::container("Blocks"),
            states: IndexMap::new(),
            load_listeners: Vec::new(),
            change_listeners: Vec::new(),
        }
    }

    /// Wraps an existing tree.
    ///
    /// # Errors
    /// Fails if `root` is not a container.
    pub fn from_root(root: Block) -> Result<Self, HostError> {
        if !root.is_container() {
            return Err(HostError::NotAContainer(root.id()));
        }
        Ok(Self { root, ..Self::new() })
    }

    #[must_use]
    pub const fn root(&self) -> &Block {
        &self.root
    }

    #[must_use]
    pub fn find(&self, id: BlockId) -> Option<&Block> {
        self.root.find(id)
    }

    /// Whether `id` names a block of the tree or a state slot.
    #[must_use]
    pub fn contains(&self, id: BlockId) -> bool {
        self.states.contains_key(&id) || self.root.find(id).is_some()
    }

    /// Adds `block` under the container `parent`.
    ///
    /// # Errors
    /// Fails if `parent` is unknown or is a leaf.
    pub fn add(&mut self, parent: BlockId, block: Block) -> Result<BlockId, HostError> {
        self.root.find_mut(parent).ok_or(HostError::UnknownBlock(parent))?.push_child(block)
    }

    /// Creates a hidden state slot holding `initial`.
    pub fn state(&mut self, initial: impl Into<PropValue>) -> BlockId {
        let id = BlockId::next();
        self.states.insert(id, initial.into());
        id
    }

    /// Current value of a state slot or of a block's `value` prop.
    #[must_use]
    pub fn value(&self, id: BlockId) -> Option<&PropValue> {
        self.states.get(&id).or_else(|| self.root.find(id)?.get_prop("value"))
    }

    /// Registers a page load listener writing into `output`.
    ///
    /// # Errors
    /// Fails if `output` is unknown.
    pub fn on_load<F>(&mut self, output: BlockId, handler: F) -> Result<(), HostError>
    where
        F: Fn(&Request) -> PropValue + 'static,
    {
        if !self.contains(output) {
            return Err(HostError::UnknownBlock(output));
        }
        self.load_listeners.push(LoadListener { output, handler: Box::new(handler) });
        Ok(())
    }

    /// Registers a listener on value changes of `input`.
    ///
    /// The handler must return exactly one update per output, in order.
    ///
    /// # Errors
    /// Fails if `input` or any output is unknown.
    pub fn on_change<F>(
        &mut self,
        input: BlockId,
        outputs: Vec<BlockId>,
        handler: F,
    ) -> Result<(), HostError>
    where
        F: Fn(&PropValue) -> Vec<Update> + 'static,
    {
        if let Some(unknown) =
            std::iter::once(input).chain(outputs.iter().copied()).find(|id| !self.contains(*id))
        {
            return Err(HostError::UnknownBlock(unknown));
        }
        self.change_listeners.push(ChangeListener { input, outputs, handler: Box::new(handler) });
        Ok(())
    }

    /// Simulates a page load for `request`.
    ///
    /// Every load listener writes its output, and the change listeners of
    /// those outputs fire even when the value is unchanged.
    ///
    /// # Errors
    /// Fails if a change listener returns the wrong number of updates.
    pub fn load(&mut self, request: &Request) -> Result<(), HostError> {
        let values: Vec<(BlockId, PropValue)> = self
            .load_listeners
            .iter()
            .map(|listener| (listener.output, (listener.handler)(request)))
            .collect();

        for (output, value) in values {
            self.assign(output, value, true)?;
        }
        Ok(())
    }

    /// Sets the value of a block or state slot, firing change listeners when
    /// it differs from the current value.
    ///
    /// # Errors
    /// Fails if `id` is unknown or a listener returns the wrong number of
    /// updates.
    pub fn set_value(&mut self, id: BlockId, value: impl Into<PropValue>) -> Result<(), HostError> {
        self.assign(id, value.into(), false)
    }

    /// Writes a value and runs the listeners watching it.
    fn assign(&mut self, id: BlockId, value: PropValue, force: bool) -> Result<(), HostError> {
        let changed = self.replace_value(id, value)?;
        if !changed && !force {
            return Ok(());
        }

        let Some(value) = self.value(id).cloned() else {
            return Ok(());
        };
        let pending: Vec<(Vec<BlockId>, Vec<Update>)> = self
            .change_listeners
            .iter()
            .filter(|listener| listener.input == id)
            .map(|listener| (listener.outputs.clone(), (listener.handler)(&value)))
            .collect();

        for (outputs, updates) in pending {
            self.apply_updates(&outputs, updates)?;
        }
        Ok(())
    }

    /// Stores `value`, returning whether it changed.
    fn replace_value(&mut self, id: BlockId, value: PropValue) -> Result<bool, HostError> {
        if let Some(slot) = self.states.get_mut(&id) {
            if *slot == value {
                return Ok(false);
            }
            *slot = value;
            return Ok(true);
        }

        let block = self.root.find_mut(id).ok_or(HostError::UnknownBlock(id))?;
        if block.get_prop("value") == Some(&value) {
            return Ok(false);
        }
        block.set_prop("value", value);
        Ok(true)
    }

    /// Writes one update per output, matched by position.
    ///
    /// # Errors
    /// Fails if the counts differ or an output is unknown.
    pub fn apply_updates(&mut self, outputs: &[BlockId], updates: Vec<Update>) -> Result<(), HostError> {
        if outputs.len() != updates.len() {
            return Err(HostError::OutputMismatch {
                expected: outputs.len(),
                actual: updates.len(),
            });
        }

        for (&id, update) in outputs.iter().zip(updates) {
            if let Some(slot) = self.states.get_mut(&id) {
                if let Some(value) = update.prop("value") {
                    slot.clone_from(value);
                }
                continue;
            }
            self.root.find_mut(id).ok_or(HostError::UnknownBlock(id))?.apply(&update);
        }
        Ok(())
    }
}

impl fmt::Debug for Blocks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blocks")
            .field("root", &self.root)
            .field("states", &self.states)
            .field("load_listeners", &self.load_listeners.len())
            .field("change_listeners", &self.change_listeners.len())
            .finish()
    }
}
