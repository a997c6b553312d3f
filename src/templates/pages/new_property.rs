use crate::api::ApiError;
use crate::templates::components::{api_error_banner, error_banner};
use crate::templates::desktop_layout;
use maud::{html, Markup};

/// Upload form. `address` is echoed back after a rejected submission.
pub fn new_property_page(address: &str, invalid: Option<&str>, api_error: Option<&ApiError>) -> Markup {
    desktop_layout(
        "New Property",
        "/properties/new",
        html! {
            h1 { "New property" }
            p class="muted" { "Upload a floor plan (PNG, JPG or PDF, up to 10 MB) and we'll extract the layout, estimate its value and draft listing copy." }

            @if let Some(message) = invalid { (error_banner(message)) }
            @if let Some(err) = api_error { (api_error_banner(err)) }

            form method="post" action="/properties/new" enctype="multipart/form-data" class="upload-form" {
                label {
                    "Floor plan"
                    input type="file" name="file" required accept="image/png,image/jpeg,application/pdf";
                }
                label {
                    "Property address"
                    input type="text" name="address" required placeholder="123 Main St, Springfield, IL 62701" value=(address);
                }
                button type="submit" class="btn btn-primary" { "Upload and analyze" }
            }
        },
    )
}
