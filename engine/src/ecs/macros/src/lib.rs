mod component;
mod system;

use proc_macro::TokenStream;

#[proc_macro_derive(Component)]
pub fn derive_component(item: TokenStream) -> TokenStream {
    component::derive_component(item)
}

/// Implement `System` for a type. List the capability traits the type implements in a `system`
/// attribute, e.g. `#[system(initialize, execute)]`, and the matching `as_*` accessors are
/// generated.
#[proc_macro_derive(System, attributes(system))]
pub fn derive_system(item: TokenStream) -> TokenStream {
    system::derive_system(item)
}
