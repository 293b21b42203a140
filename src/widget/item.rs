//! Child items of an expando
//!
//! An expando lays out anything implementing `Item`: it only needs a
//! preferred size, margins, visibility and somewhere to store its bounds.

use std::fmt;

use crate::error::{ExplorerBarError, Result};
use crate::render::Surface;
use crate::theme::types::{Padding, Rect, Size};
use crate::theme::TaskItemStyle;

use super::ItemId;

/// How an item takes part in layout and painting
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemVisibility {
    /// Laid out and painted
    Visible,
    /// Laid out but not painted (covered by a fade snapshot)
    HiddenButPresent,
    /// Neither laid out nor painted
    Hidden,
}

impl ItemVisibility {
    /// Whether the item occupies space in the layout
    pub fn takes_space(&self) -> bool {
        !matches!(self, ItemVisibility::Hidden)
    }
}

/// Layout state every item carries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemState {
    /// Position relative to the owning expando
    pub bounds: Rect,
    pub visible: bool,
    /// Temporarily hidden while a snapshot stands in for the item
    pub suppressed: bool,
    pub hot: bool,
}

impl Default for ItemState {
    fn default() -> Self {
        Self {
            bounds: Rect::zero(),
            visible: true,
            suppressed: false,
            hot: false,
        }
    }
}

impl ItemState {
    pub fn visibility(&self) -> ItemVisibility {
        match (self.visible, self.suppressed) {
            (false, _) => ItemVisibility::Hidden,
            (true, true) => ItemVisibility::HiddenButPresent,
            (true, false) => ItemVisibility::Visible,
        }
    }
}

/// A positionable, paintable child of an expando
pub trait Item: fmt::Debug {
    fn id(&self) -> ItemId;

    fn state(&self) -> &ItemState;

    fn state_mut(&mut self) -> &mut ItemState;

    /// Size the item wants when given `available_width`
    fn preferred_size(&self, available_width: i32, style: &TaskItemStyle) -> Size;

    /// Spacing around the item
    fn margin(&self, style: &TaskItemStyle) -> Padding {
        style.margin
    }

    /// Paint into `rect` (surface coordinates)
    fn paint(&self, surface: &mut dyn Surface, rect: Rect, style: &TaskItemStyle);

    /// Whether clicking the item reports `ItemClicked`
    fn is_clickable(&self) -> bool {
        false
    }

    fn visibility(&self) -> ItemVisibility {
        self.state().visibility()
    }

    fn bounds(&self) -> Rect {
        self.state().bounds
    }

    /// Update hover state, returning whether it changed
    fn set_hot(&mut self, hot: bool) -> bool {
        let state = self.state_mut();
        let changed = state.hot != hot;
        state.hot = hot;
        changed
    }
}

/// An opaque block of fixed size, standing in for an embedded control
#[derive(Clone, Debug)]
pub struct FixedItem {
    id: ItemId,
    size: Size,
    margin: Option<Padding>,
    state: ItemState,
}

impl FixedItem {
    pub fn new(id: ItemId, size: Size) -> Self {
        Self {
            id,
            size,
            margin: None,
            state: ItemState::default(),
        }
    }

    /// Override the theme's item margin
    pub fn with_margin(mut self, margin: Padding) -> Self {
        self.margin = Some(margin);
        self
    }
}

impl Item for FixedItem {
    fn id(&self) -> ItemId {
        self.id
    }

    fn state(&self) -> &ItemState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ItemState {
        &mut self.state
    }

    fn preferred_size(&self, available_width: i32, _style: &TaskItemStyle) -> Size {
        Size::new(self.size.width.min(available_width.max(0)), self.size.height)
    }

    fn margin(&self, style: &TaskItemStyle) -> Padding {
        self.margin.unwrap_or(style.margin)
    }

    fn paint(&self, surface: &mut dyn Surface, rect: Rect, style: &TaskItemStyle) {
        surface.stroke_rect(rect, style.disabled_color, 1);
    }
}

/// Ordered item list with validated mutators.
///
/// Indices are clamped; ids must be unique.
#[derive(Debug, Default)]
pub struct ItemCollection {
    items: Vec<Box<dyn Item>>,
}

impl ItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    pub fn get(&self, id: ItemId) -> Option<&dyn Item> {
        self.items
            .iter()
            .find(|item| item.id() == id)
            .map(|item| &**item)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Box<dyn Item>> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Item> {
        self.items.iter().map(|item| &**item)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn Item>> {
        self.items.iter_mut()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id()).collect()
    }

    /// Append an item
    pub fn push(&mut self, item: Box<dyn Item>) -> Result<usize> {
        let index = self.items.len();
        self.insert(index, item)
    }

    /// Insert at `index` (clamped). Returns the index actually used.
    pub fn insert(&mut self, index: usize, item: Box<dyn Item>) -> Result<usize> {
        if self.contains(item.id()) {
            return Err(ExplorerBarError::InvalidArgument(format!(
                "{} is already in the collection",
                item.id()
            )));
        }
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        Ok(index)
    }

    pub fn remove(&mut self, id: ItemId) -> Result<Box<dyn Item>> {
        let index = self.index_of(id).ok_or(ExplorerBarError::ItemNotFound(id))?;
        Ok(self.items.remove(index))
    }

    /// Move an item to `index` (clamped). Returns the final index.
    pub fn move_to(&mut self, id: ItemId, index: usize) -> Result<usize> {
        let from = self.index_of(id).ok_or(ExplorerBarError::ItemNotFound(id))?;
        let item = self.items.remove(from);
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(id: u64) -> Box<dyn Item> {
        Box::new(FixedItem::new(ItemId(id), Size::new(10, 10)))
    }

    #[test]
    fn test_visibility_states() {
        let mut state = ItemState::default();
        assert_eq!(state.visibility(), ItemVisibility::Visible);
        state.suppressed = true;
        assert_eq!(state.visibility(), ItemVisibility::HiddenButPresent);
        assert!(state.visibility().takes_space());
        state.visible = false;
        assert_eq!(state.visibility(), ItemVisibility::Hidden);
        assert!(!state.visibility().takes_space());
    }

    #[test]
    fn test_insert_clamps_index() {
        let mut items = ItemCollection::new();
        items.push(fixed(1)).unwrap();
        assert_eq!(items.insert(99, fixed(2)).unwrap(), 1);
        assert_eq!(items.insert(0, fixed(3)).unwrap(), 0);
        assert_eq!(items.ids(), vec![ItemId(3), ItemId(1), ItemId(2)]);
    }

    #[test]
    fn test_duplicate_insert_is_rejected_without_mutation() {
        let mut items = ItemCollection::new();
        items.push(fixed(1)).unwrap();
        let err = items.push(fixed(1)).unwrap_err();
        assert!(matches!(err, ExplorerBarError::InvalidArgument(_)));
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_move_and_remove() {
        let mut items = ItemCollection::new();
        for id in 1..=3 {
            items.push(fixed(id)).unwrap();
        }
        assert_eq!(items.move_to(ItemId(1), 10).unwrap(), 2);
        assert_eq!(items.ids(), vec![ItemId(2), ItemId(3), ItemId(1)]);

        assert_eq!(
            items.move_to(ItemId(9), 0).unwrap_err(),
            ExplorerBarError::ItemNotFound(ItemId(9))
        );
        assert!(items.remove(ItemId(3)).is_ok());
        assert_eq!(
            items.remove(ItemId(3)).unwrap_err(),
            ExplorerBarError::ItemNotFound(ItemId(3))
        );
    }

    #[test]
    fn test_fixed_item_clamps_width() {
        let item = FixedItem::new(ItemId(1), Size::new(100, 20));
        let style = TaskItemStyle::default();
        assert_eq!(item.preferred_size(40, &style), Size::new(40, 20));
        assert_eq!(item.margin(&style), style.margin);
    }
}
