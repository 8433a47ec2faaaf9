use std::sync::Arc;

use log::warn;

use crate::anchors::{AnnotationId, RangeIndex};
use crate::models::Document;

/// Classes a renderer puts on highlights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationStyle {
    pub highlight_class: String,
    pub active_class: String,
}

impl Default for DecorationStyle {
    fn default() -> Self {
        let config = marginalia_config::DecorationConfig::default();
        Self {
            highlight_class: config.highlight_class,
            active_class: config.active_class,
        }
    }
}

/// One highlight interval, tagged with the id it renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    pub id: AnnotationId,
    pub class: String,
}

impl Decoration {
    pub fn contains(&self, pos: usize) -> bool {
        self.from <= pos && pos < self.to
    }
}

/// Highlights for every indexed range plus an optional active overlay.
///
/// The base set is shared between copies; moving the active overlay never
/// touches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationSet {
    base: Arc<[Decoration]>,
    active_id: Option<AnnotationId>,
    active: Option<Decoration>,
    style: Arc<DecorationStyle>,
}

impl DecorationSet {
    /// Compile highlights from `index`. Ranges that do not fit `doc` are
    /// left out.
    pub fn compile(
        index: &RangeIndex,
        doc: &Document,
        style: Arc<DecorationStyle>,
        active_id: Option<AnnotationId>,
    ) -> Self {
        let size = doc.size();
        let mut base: Vec<Decoration> = index
            .iter()
            .filter(|(id, range)| {
                let valid = range.is_valid(size);
                if !valid {
                    warn!("no highlight for anchor {id}: {range:?} does not fit size {size}");
                }
                valid
            })
            .map(|(id, range)| Decoration {
                from: range.from,
                to: range.to,
                id: id.clone(),
                class: style.highlight_class.clone(),
            })
            .collect();
        base.sort_by(|a, b| (a.from, a.to, &a.id).cmp(&(b.from, b.to, &b.id)));

        let set = Self {
            base: base.into(),
            active_id: None,
            active: None,
            style,
        };
        set.set_active(active_id)
    }

    /// Same base highlights, new overlay. An id without a highlight renders
    /// no overlay but stays selected.
    pub fn set_active(&self, id: Option<AnnotationId>) -> Self {
        let active = id.as_ref().and_then(|id| {
            self.base
                .iter()
                .find(|decoration| &decoration.id == id)
                .map(|decoration| Decoration {
                    class: self.style.active_class.clone(),
                    ..decoration.clone()
                })
        });
        Self {
            base: Arc::clone(&self.base),
            active_id: id,
            active,
            style: Arc::clone(&self.style),
        }
    }

    pub fn clear_active(&self) -> Self {
        self.set_active(None)
    }

    pub fn active_id(&self) -> Option<&AnnotationId> {
        self.active_id.as_ref()
    }

    pub fn active(&self) -> Option<&Decoration> {
        self.active.as_ref()
    }

    pub fn style(&self) -> Arc<DecorationStyle> {
        Arc::clone(&self.style)
    }

    pub fn base(&self) -> &[Decoration] {
        &self.base
    }

    /// Base highlights in position order, then the overlay.
    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.base.iter().chain(self.active.iter())
    }

    /// Base highlights covering `pos`.
    pub fn at(&self, pos: usize) -> impl Iterator<Item = &Decoration> {
        self.base.iter().filter(move |d| d.contains(pos))
    }

    pub fn len(&self) -> usize {
        self.base.len() + usize::from(self.active.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.active.is_none()
    }

    #[cfg(test)]
    pub(crate) fn shares_base_with(&self, other: &DecorationSet) -> bool {
        Arc::ptr_eq(&self.base, &other.base)
    }
}
