//! Query options and headers rendered as request configuration.

#[cfg(test)]
mod tests {
    use http::Method;

    use crate::{request, snippet};

    #[test]
    fn test_should_keep_nested_expand_verbatim() {
        let get = request(Method::GET, "/v1.0/groups?$expand=members($select=id,displayName)");
        let csharp = snippet(&get, "csharp").unwrap();
        assert!(csharp.contains(
            "requestConfiguration.QueryParameters.Expand = new string []{ \"members($select=id,displayName)\" };"
        ));
        assert!(!csharp.contains("QueryParameters.Select"));

        let python = snippet(&get, "python").unwrap();
        assert!(python.contains("\texpand = [\"members($select=id,displayName)\"],"));
        assert!(!python.contains("\tselect = "));
    }

    #[test]
    fn test_should_render_typed_query_values_and_headers() {
        let get = request(
            Method::GET,
            "/v1.0/me/messages?$filter=importance%20eq%20'high'&$count=true&$top=5",
        )
        .with_header("ConsistencyLevel", "eventual")
        .with_header("Content-Length", "0");
        let csharp = snippet(&get, "csharp").unwrap();
        assert!(csharp.contains("\trequestConfiguration.QueryParameters.Filter = \"importance eq 'high'\";"));
        assert!(csharp.contains("\trequestConfiguration.QueryParameters.Count = true;"));
        assert!(csharp.contains("\trequestConfiguration.QueryParameters.Top = 5;"));
        assert!(csharp.contains("\trequestConfiguration.Headers.Add(\"ConsistencyLevel\", \"eventual\");"));
        assert!(!csharp.contains("Content-Length"));
        assert!(csharp.contains("await graphClient.Me.Messages.GetAsync((requestConfiguration) =>\n{"));
    }

    #[test]
    fn test_should_pass_configuration_to_go_call() {
        let get = request(Method::GET, "/v1.0/groups?$select=displayName")
            .with_header("Prefer", "outlook.body-content-type=\"text\"");
        let go = snippet(&get, "go").unwrap();
        assert!(go.contains("headers := abstractions.NewRequestHeaders()"));
        assert!(go.contains("requestParameters := &graphgroups.GroupsRequestBuilderGetQueryParameters{"));
        assert!(go.contains("\tSelect: [] string {\"displayName\"},"));
        assert!(go.contains("result, err := graphClient.Groups().Get(context.Background(), configuration)"));
    }
}
