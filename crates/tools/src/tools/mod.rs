//! The planner tool catalogue.

pub mod menu;
pub mod meta;
pub mod shopping;
pub mod weight;

use crate::registry::{RegistryError, ToolRegistry};

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::postgres::PgPoolOptions;

    use hearth_store::Store;

    use crate::tool::ToolContext;

    /// A context whose pool is lazy and points at an unreachable address:
    /// any query attempt errors, so a test that still gets a response
    /// envelope has also proven the code path issued zero store calls.
    pub(crate) fn test_context(default_owner: Option<&str>) -> ToolContext {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://nobody@localhost:1/unreachable")
            .expect("lazy pool construction");
        ToolContext::new(Store::new(pool), default_owner.map(String::from))
    }
}

/// Register the full planner catalogue.
pub fn register_all(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(meta::DefaultOwnerTool)?;

    registry.register(shopping::ShoppingListTool)?;
    registry.register(shopping::ShoppingAddTool)?;
    registry.register(shopping::ShoppingUpdateTool)?;
    registry.register(shopping::ShoppingSetDoneTool)?;
    registry.register(shopping::ShoppingDeleteTool)?;

    registry.register(menu::MenuListTool)?;
    registry.register(menu::MenuAddTool)?;
    registry.register(menu::MenuUpdateTool)?;
    registry.register(menu::MenuSetDoneTool)?;
    registry.register(menu::MenuDeleteTool)?;
    registry.register(menu::MenuUpsertDayTool)?;

    registry.register(weight::WeightListTool)?;
    registry.register(weight::WeightAddTool)?;
    registry.register(weight::WeightUpdateTool)?;
    registry.register(weight::WeightDeleteTool)?;
    registry.register(weight::WeightUpsertByDateTool)?;

    Ok(())
}
