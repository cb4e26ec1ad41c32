//! Record actions that do not fit the generic collection methods.
//!
//! Each is one HTTP call; failures propagate unchanged.

use crate::api_client::ClientError;
use crate::requests::{
    AssignTicket, ChangePassword, ReorderImages, ReportQuery, SetPermissions,
};
use crate::responses::Report;
use crate::{
    APIClient, PaymentMethodId, ProductId, ProductImageId, ReviewId, RoleId,
    TicketId, UserId,
};
use reqwest::Method;
use serde_json::json;

/// Users
impl APIClient {
    pub async fn activate_user(&self, id: UserId) -> Result<(), ClientError> {
        self.action::<()>(&format!("users/{id}/activate/"), None).await
    }

    pub async fn deactivate_user(&self, id: UserId) -> Result<(), ClientError> {
        self.action::<()>(&format!("users/{id}/deactivate/"), None)
            .await
    }

    pub async fn change_password(
        &self,
        id: UserId,
        details: &ChangePassword,
    ) -> Result<(), ClientError> {
        self.action(&format!("users/{id}/change-password/"), Some(details))
            .await
    }
}

/// Roles
impl APIClient {
    /// Replace the role's permission set.
    pub async fn set_role_permissions(
        &self,
        id: RoleId,
        details: &SetPermissions,
    ) -> Result<(), ClientError> {
        self.action(&format!("roles/{id}/permissions/"), Some(details))
            .await
    }

    pub async fn activate_role(&self, id: RoleId) -> Result<(), ClientError> {
        self.action::<()>(&format!("roles/{id}/activate/"), None).await
    }

    pub async fn deactivate_role(&self, id: RoleId) -> Result<(), ClientError> {
        self.action::<()>(&format!("roles/{id}/deactivate/"), None)
            .await
    }
}

/// Payment methods
impl APIClient {
    pub async fn activate_payment_method(
        &self,
        id: PaymentMethodId,
    ) -> Result<(), ClientError> {
        self.action::<()>(&format!("payment-methods/{id}/activate/"), None)
            .await
    }

    pub async fn deactivate_payment_method(
        &self,
        id: PaymentMethodId,
    ) -> Result<(), ClientError> {
        self.action::<()>(&format!("payment-methods/{id}/deactivate/"), None)
            .await
    }

    /// Make this the principal method; the backend demotes the previous one.
    pub async fn mark_principal_payment_method(
        &self,
        id: PaymentMethodId,
    ) -> Result<(), ClientError> {
        self.action::<()>(
            &format!("payment-methods/{id}/mark-principal/"),
            None,
        )
        .await
    }
}

/// Reviews
impl APIClient {
    pub async fn approve_review(&self, id: ReviewId) -> Result<(), ClientError> {
        self.action::<()>(&format!("reviews/{id}/approve/"), None).await
    }

    pub async fn reject_review(&self, id: ReviewId) -> Result<(), ClientError> {
        self.action::<()>(&format!("reviews/{id}/reject/"), None).await
    }
}

/// Products
impl APIClient {
    pub async fn reorder_product_images(
        &self,
        id: ProductId,
        order: Vec<ProductImageId>,
    ) -> Result<(), ClientError> {
        self.action(
            &format!("products/{id}/reorder-images/"),
            Some(&ReorderImages { order }),
        )
        .await
    }

    pub async fn set_product_active(
        &self,
        id: ProductId,
        is_active: bool,
    ) -> Result<(), ClientError> {
        self.request(
            Method::PATCH,
            &format!("products/{id}/"),
            Some(&json!({ "is_active": is_active })),
            &[],
        )
        .await?;
        Ok(())
    }
}

/// Support tickets
impl APIClient {
    pub async fn assign_ticket(
        &self,
        id: TicketId,
        assignee: UserId,
    ) -> Result<(), ClientError> {
        self.action(
            &format!("tickets/{id}/assign/"),
            Some(&AssignTicket { assignee }),
        )
        .await
    }

    pub async fn close_ticket(&self, id: TicketId) -> Result<(), ClientError> {
        self.action::<()>(&format!("tickets/{id}/close/"), None).await
    }
}

/// Reports
impl APIClient {
    pub async fn fetch_report(
        &self,
        query: &ReportQuery,
    ) -> Result<Report, ClientError> {
        let params = crate::api_client::query_params(query)?;
        let envelope = self
            .request::<()>(
                Method::GET,
                &format!("reports/{}/", query.kind.as_str()),
                None,
                &params,
            )
            .await?;
        crate::envelope::decode_data(envelope)
    }
}
