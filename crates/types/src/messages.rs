use crate::item::Catalog;

/// Application-level messages delivered to the TUI components.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Periodic animation tick
    Tick,
    /// Terminal resized to the given width and height
    Resize(u16, u16),
    /// The catalog finished loading
    CatalogLoaded(Catalog),
    /// The catalog could not be loaded; carries a diagnostic for the logs
    CatalogLoadFailed(String),
}

/// Side effects requested by components and executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open an external link in the system browser
    OpenLink(String),
    /// Display a modal view
    ShowModal(Modal),
    /// Hide any open modal
    CloseModal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    /// The expanded view of the card with the given rank
    CardDetail { rank: u32 },
}
