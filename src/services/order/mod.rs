//! Department orders: requests to treatment, pharmacy and imaging.

use anyhow::{anyhow, Context, Result};
use serde_json::json;

use crate::models::order::{DepartmentOrder, OrderImage, OrderStatus};
use crate::services::backend::{fetch_records, from_row, to_row, Backend, Collection};

/// Board order of department orders
pub const ORDER_INDEX_FIELD: &str = "order_index";

pub struct OrderService<'a> {
    backend: &'a dyn Backend,
}

impl<'a> OrderService<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    pub fn list_all(&self) -> Result<Vec<DepartmentOrder>> {
        fetch_records(self.backend, Collection::DepartmentOrders, Some(ORDER_INDEX_FIELD))
    }

    /// Insert a new order or overwrite an existing one.
    pub fn save(&self, order: &DepartmentOrder) -> Result<DepartmentOrder> {
        order.validate().map_err(|e| anyhow!(e))?;
        let row = to_row(order)?;

        let saved = match order.id.as_deref() {
            Some(id) => self
                .backend
                .update(Collection::DepartmentOrders, id, row)
                .with_context(|| format!("Failed to save order {}", id))?,
            None => self
                .backend
                .insert(Collection::DepartmentOrders, vec![row])
                .context("Failed to create order")?,
        };
        let row = saved
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Order was not saved"))?;
        from_row(row)
    }

    /// Mark an order done, as dropping it on the completion zone does.
    pub fn complete(&self, order_id: &str) -> Result<()> {
        self.set_status(order_id, OrderStatus::Completed)
    }

    pub fn set_status(&self, order_id: &str, status: OrderStatus) -> Result<()> {
        let updated = self
            .backend
            .update(
                Collection::DepartmentOrders,
                order_id,
                json!({ "status": to_row(&status)? }),
            )
            .with_context(|| format!("Failed to update order {}", order_id))?;
        if updated.is_empty() {
            return Err(anyhow!("Order {} not found", order_id));
        }
        Ok(())
    }

    /// Append an uploaded image to an order's gallery.
    pub fn attach_image(&self, order_id: &str, image: OrderImage) -> Result<()> {
        let mut order = self
            .list_all()?
            .into_iter()
            .find(|o| o.id.as_deref() == Some(order_id))
            .ok_or_else(|| anyhow!("Order {} not found", order_id))?;
        order.images.push(image);
        self.backend
            .update(
                Collection::DepartmentOrders,
                order_id,
                json!({ "images": to_row(&order.images)? }),
            )
            .with_context(|| format!("Failed to attach image to order {}", order_id))?;
        Ok(())
    }

    pub fn delete(&self, order_id: &str) -> Result<()> {
        self.backend
            .delete(Collection::DepartmentOrders, order_id)
            .with_context(|| format!("Failed to delete order {}", order_id))
    }
}
