//! Call chains built from request paths.

#[cfg(test)]
mod tests {
    use http::Method;

    use crate::{generator, request, snippet};

    #[test]
    fn test_should_reach_me_then_messages_in_every_language() {
        let generator = generator();
        let get = request(Method::GET, "https://graph.microsoft.com/v1.0/me/messages");
        for language in generator.supported_languages() {
            let snippet = generator.snippet_for(&get, language).unwrap();
            let expected = match language {
                "csharp" => ".Me.Messages.GetAsync()",
                "go" => ".Me().Messages().Get(",
                "python" => ".me.messages.get()",
                other => panic!("no expectation for {other}"),
            };
            assert!(snippet.contains(expected), "{language}:\n{snippet}");
        }
    }

    #[test]
    fn test_should_render_collection_and_keyed_access() {
        let get = request(Method::GET, "/v1.0/me/messages/AAMkAGI2T");
        let csharp = snippet(&get, "csharp").unwrap();
        assert!(csharp.contains("graphClient.Me.Messages[\"{message-id}\"].GetAsync()"));

        let python = snippet(&get, "python").unwrap();
        assert!(python.contains(".me.messages.by_message_id(\"message-id\").get()"));

        let go = snippet(&get, "go").unwrap();
        assert!(go.contains(".Me().Messages().ByMessageId(\"message-id\").Get(context.Background(), nil)"));
    }

    #[test]
    fn test_should_render_disambiguated_directory_accessor() {
        let get = request(
            Method::GET,
            "/v1.0/directory/administrativeUnits/4d7ea995/scopedRoleMembers",
        );
        let csharp = snippet(&get, "csharp").unwrap();
        assert!(csharp.contains(
            "graphClient.DirectoryObject.AdministrativeUnits[\"{administrativeUnit-id}\"].ScopedRoleMembers.GetAsync()"
        ));
        let python = snippet(&get, "python").unwrap();
        assert!(python.contains("graph_client.directory_object.administrative_units"));
    }

    #[test]
    fn test_should_render_function_arguments_in_declared_order() {
        let get = request(
            Method::GET,
            "/v1.0/me/reminderView(EndDateTime='2024-01-02',StartDateTime='2024-01-01')",
        );
        let csharp = snippet(&get, "csharp").unwrap();
        assert!(csharp.contains(
            ".ReminderViewWithStartDateTimeWithEndDateTime(\"2024-01-01\", \"2024-01-02\").GetAsync()"
        ));
    }

    #[test]
    fn test_should_select_alternate_key_builder() {
        let get = request(Method::GET, "/v1.0/users(userPrincipalName='ada@contoso.com')");
        let csharp = snippet(&get, "csharp").unwrap();
        assert!(csharp.contains(".UsersWithUserPrincipalName(\"ada@contoso.com\").GetAsync()"));
        assert!(!csharp.contains("[\"{user-id}\"]"));
    }

    #[test]
    fn test_should_collapse_type_cast_into_previous_segment() {
        let get = request(Method::GET, "/v1.0/groups/02bd9fd6/members/microsoft.graph.user");
        let csharp = snippet(&get, "csharp").unwrap();
        assert!(csharp.contains(".Groups[\"{group-id}\"].Members.GraphUser.GetAsync()"));
    }

    #[test]
    fn test_should_render_special_segments() {
        let csharp = snippet(&request(Method::GET, "/v1.0/me/messages/$count"), "csharp").unwrap();
        assert!(csharp.contains(".Me.Messages.Count.GetAsync()"));

        let csharp = snippet(&request(Method::GET, "/v1.0/me/messages/AAMk/$value"), "csharp").unwrap();
        assert!(csharp.contains(".Me.Messages[\"{message-id}\"].Content.GetAsync()"));
    }

    #[test]
    fn test_should_rewrite_legacy_drive_paths() {
        let get = request(Method::GET, "/v1.0/me/drive/root:/Documents/report.txt:/content");
        let csharp = snippet(&get, "csharp").unwrap();
        assert!(csharp.contains(
            ".Drives[\"{drive-id}\"].Items[\"{driveItem-id}\"].Content.GetAsync()"
        ));
    }

    #[test]
    fn test_should_not_capture_result_of_bodiless_delete() {
        let delete = request(Method::DELETE, "/v1.0/groups/02bd9fd6");
        let csharp = snippet(&delete, "csharp").unwrap();
        assert!(csharp.ends_with("await graphClient.Groups[\"{group-id}\"].DeleteAsync();\n"));
        let python = snippet(&delete, "python").unwrap();
        assert!(python.ends_with("await graph_client.groups.by_group_id(\"group-id\").delete()\n"));
    }
}
