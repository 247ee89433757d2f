//! Routes command - prints the envelope endpoint table

use clap::Args;

use crate::api::dispatch::Route;
use crate::api::route_table;

/// Arguments for the routes command
#[derive(Args, Clone, Debug)]
pub struct RoutesArgs {
    /// Only show one controller (`partners` or `pmpartners`)
    #[arg(long)]
    pub controller: Option<String>,
}

/// Print the route table to stdout
pub fn run(args: RoutesArgs) -> anyhow::Result<()> {
    let routes = route_table();
    let selected = select(&routes, args.controller.as_deref());

    if selected.is_empty() {
        anyhow::bail!(
            "no routes for controller '{}'",
            args.controller.unwrap_or_default()
        );
    }

    print!("{}", render(&selected));
    Ok(())
}

fn select<'a>(routes: &'a [Route], controller: Option<&str>) -> Vec<&'a Route> {
    routes
        .iter()
        .filter(|route| match controller {
            Some(name) => route.path.trim_start_matches('/').split('/').next() == Some(name),
            None => true,
        })
        .collect()
}

fn render(routes: &[&Route]) -> String {
    let width = routes.iter().map(|r| r.path.len()).max().unwrap_or(0);

    routes
        .iter()
        .map(|route| {
            format!(
                "{:<5} {:<width$}  {:<9} {:<30} {}\n",
                route.verb.as_str(),
                route.path,
                if route.takes_envelope { "envelope" } else { "-" },
                route.name,
                route.response_id,
                width = width,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_by_controller() {
        let routes = route_table();

        assert_eq!(select(&routes, Some("partners")).len(), 12);
        assert_eq!(select(&routes, Some("pmpartners")).len(), 10);
        assert_eq!(select(&routes, None).len(), 22);
        assert!(select(&routes, Some("admin")).is_empty());
    }

    #[test]
    fn test_render_lists_response_ids() {
        let routes = route_table();
        let output = render(&select(&routes, Some("pmpartners")));

        assert_eq!(output.lines().count(), 10);
        assert!(output.contains("GET   /pmpartners/policyname/{PolicyName}"));
        assert!(output.contains("mosip.partnermanagement.partners.apikey.request.retrieve"));
        assert!(output.contains("echo"));
    }

    #[test]
    fn test_unknown_controller_fails() {
        let result = run(RoutesArgs {
            controller: Some("admin".to_string()),
        });
        assert!(result.is_err());
    }
}
