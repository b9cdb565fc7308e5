//! The viewer capability shared by resource tables and their decorators.

use rview_types::Gvr;

use super::ResourceTable;
use crate::ui::components::Component;
use crate::ui::keys::KeyActions;

/// Callback adding bindings to a viewer's action registry. Registered
/// callbacks run, in order, every time the viewer (re)builds its bindings.
pub type BindKeysFn = Box<dyn Fn(&mut KeyActions<dyn ResourceViewer>)>;

/// A page presenting a table of resources of one type.
pub trait ResourceViewer: Component {
    /// Resource type shown by this viewer.
    fn gvr(&self) -> &Gvr;

    fn table(&self) -> &ResourceTable;

    fn table_mut(&mut self) -> &mut ResourceTable;

    /// Registers a callback contributing key bindings.
    fn add_bind_keys_fn(&mut self, bind: BindKeysFn);

    /// Active key bindings.
    fn actions(&self) -> &KeyActions<dyn ResourceViewer>;
}
