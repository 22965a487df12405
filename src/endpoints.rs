//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use [format_endpoint].

/// The route for signing in a user verified by the identity provider.
pub const SIGN_IN: &str = "/api/sign_in";
/// The route for the client to sign out the current user.
pub const SIGN_OUT: &str = "/api/sign_out";
/// The route for the dashboard totals and charts.
pub const DASHBOARD: &str = "/api/dashboard";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for the registered categories.
pub const CATEGORIES: &str = "/api/categories";
/// The route for the categories the user has recorded.
pub const USED_CATEGORIES: &str = "/api/categories/used";
/// The route to download every transaction as CSV.
pub const EXPORT_TRANSACTIONS: &str = "/api/export/transactions.csv";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns
/// `endpoint_path` unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map_or(endpoint_path.len(), |end| param_start + end + 1);

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
