use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

/// Subscription record as sent and returned over HTTP.
#[derive(ToSchema)]
pub struct SubscriptionDoc {
    #[schema(example = "Yandex Plus")]
    pub service_name: String,
    #[schema(example = 400, minimum = 0)]
    pub price: i32,
    #[schema(example = "60601fee-2bf1-4721-ae6f-7636e79a0cba")]
    pub user_id: String,
    #[schema(example = "07-2025")]
    pub start_date: String,
}

#[derive(ToSchema)]
pub struct CreatedIdDoc { pub id: i32 }

#[derive(ToSchema)]
pub struct ListResultDoc { pub items: Vec<SubscriptionDoc> }

#[derive(ToSchema)]
pub struct SumResultDoc { pub total: i64 }

#[derive(utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterQueryDoc {
    /// Case-insensitive substring of the service name
    pub name: Option<String>,
    pub user_id: Option<String>,
    /// Exact price; 0 or less means no constraint. Ignored by `/service/sum`.
    pub price: Option<i32>,
    /// Earliest start month, `MM-YYYY`
    pub from: Option<String>,
    /// Latest start month, `MM-YYYY`
    pub to: Option<String>,
    /// `service_created_at` (default), `service_price` or `service_name`
    pub sort: Option<String>,
    /// `asc` or `desc` (default)
    pub dir: Option<String>,
    /// 1..=100, default 50
    pub limit: Option<i64>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::subscriptions::create_service,
        crate::routes::subscriptions::get_service,
        crate::routes::subscriptions::update_service,
        crate::routes::subscriptions::delete_service,
        crate::routes::subscriptions::list_services,
        crate::routes::subscriptions::sum_services,
    ),
    components(
        schemas(
            HealthResponse,
            SubscriptionDoc,
            CreatedIdDoc,
            ListResultDoc,
            SumResultDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "service")
    )
)]
pub struct ApiDoc;
