use crate::args::Args;
use crate::error::{Error, Result};
use crate::pattern::{self, sanitize_url, ParsedPattern};
use crate::route::Route;

/// Binds the parameters `route` captures from `url`, then overlays the
/// route's static arguments.
///
/// Static arguments win over URL captures of the same name. A parameter name
/// that appears twice keeps the later capture.
pub fn bind(route: &Route, pattern: &ParsedPattern, url: &str) -> Result<Args> {
    let matched = pattern.match_url(url).ok_or_else(|| Error::RouteNotFound {
        url: sanitize_url(url).to_owned(),
    })?;
    let alternative = &pattern.alternatives()[matched.alternative];

    let mut args: Args = alternative.param_names().zip(matched.values).collect();

    args.merge(route.static_arguments());
    Ok(args)
}

/// Like [`bind`], parsing the route's pattern on the spot.
pub fn bind_route(route: &Route, url: &str) -> Result<Args> {
    let parsed = pattern::parse(route.pattern())?;
    bind(route, &parsed, url)
}
