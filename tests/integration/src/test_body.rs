//! Request bodies rendered as object construction.

#[cfg(test)]
mod tests {
    use http::Method;

    use crate::{generator, json_request, request, snippet};

    #[test]
    fn test_should_combine_flag_enum_members_in_order() {
        let post = json_request(
            Method::POST,
            "/v1.0/communications/calls/57dab8b1/updateRecordingStatus",
            r#"{"clientContext": "c4b4", "status": "notRecording | recording , failed"}"#,
        );
        let csharp = snippet(&post, "csharp").unwrap();
        assert!(csharp.contains("var requestBody = new UpdateRecordingStatusPostRequestBody\n{"));
        assert!(csharp.contains(
            "\tStatus = RecordingStatus.NotRecording | RecordingStatus.Recording | RecordingStatus.Failed,"
        ));
        assert!(csharp.contains("using Microsoft.Graph.Communications.Calls.Item.UpdateRecordingStatus;"));
        assert!(csharp.contains(
            "await graphClient.Communications.Calls[\"{call-id}\"].UpdateRecordingStatus.PostAsync(requestBody);"
        ));

        let python = snippet(&post, "python").unwrap();
        assert!(python.contains(
            "\tstatus = RecordingStatus.NotRecording | RecordingStatus.Recording | RecordingStatus.Failed,"
        ));
    }

    #[test]
    fn test_should_keep_first_token_of_single_valued_enum() {
        let post = json_request(
            Method::POST,
            "/v1.0/me/messages",
            r#"{"subject": "Hi", "importance": "high, low"}"#,
        );
        let csharp = snippet(&post, "csharp").unwrap();
        assert!(csharp.contains("\tImportance = Importance.High,"));
        assert!(!csharp.contains("Importance.Low"));
    }

    #[test]
    fn test_should_render_empty_arrays_and_nulls() {
        let post = json_request(
            Method::POST,
            "/v1.0/me/messages",
            r#"{"subject": null, "toRecipients": []}"#,
        );
        let csharp = snippet(&post, "csharp").unwrap();
        assert!(csharp.contains("\tSubject = null,"));
        assert!(csharp.contains("\tToRecipients = new List<Recipient>\n\t{\n\t},"));

        let go = snippet(&post, "go").unwrap();
        assert!(go.contains("requestBody.SetSubject(nil)"));
        assert!(go.contains("[]graphmodels.Recipientable {"));
        assert!(go.contains("requestBody.SetToRecipients(toRecipients)"));

        let python = snippet(&post, "python").unwrap();
        assert!(python.contains("\tsubject = None,"));
        assert!(python.contains("\tto_recipients = [\n\t],"));
    }

    #[test]
    fn test_should_construct_derived_type_without_annotation() {
        let post = json_request(
            Method::POST,
            "/v1.0/me/messages/AAMkAD/attachments",
            r##"{"@odata.type": "#microsoft.graph.fileAttachment", "name": "menu.txt", "contentBytes": "SGVsbG8="}"##,
        );
        for language in generator().supported_languages() {
            let snippet = snippet(&post, language).unwrap();
            assert!(snippet.contains("FileAttachment"), "{language}:\n{snippet}");
            assert!(!snippet.contains("odata"), "{language}:\n{snippet}");
        }
        let csharp = snippet(&post, "csharp").unwrap();
        assert!(csharp.contains("var requestBody = new FileAttachment\n{\n\tName = \"menu.txt\","));
        assert!(csharp.contains("\tContentBytes = Convert.FromBase64String("));
        assert!(csharp.contains("using System;"));
    }

    #[test]
    fn test_should_render_reference_body() {
        let post = json_request(
            Method::POST,
            "/v1.0/groups/02bd9fd6/acceptedSenders/$ref",
            r#"{"@odata.id": "https://graph.microsoft.com/v1.0/users/alexd@contoso.com"}"#,
        );
        let csharp = snippet(&post, "csharp").unwrap();
        assert!(csharp.contains(
            "var requestBody = new ReferenceCreate\n{\n\tOdataId = \"https://graph.microsoft.com/v1.0/users/alexd@contoso.com\",\n};"
        ));
        assert!(csharp.contains(
            "await graphClient.Groups[\"{group-id}\"].AcceptedSenders.Ref.PostAsync(requestBody);"
        ));

        let python = snippet(&post, "python").unwrap();
        assert!(python.contains("\todata_id = \"https://graph.microsoft.com/v1.0/users/alexd@contoso.com\","));
        assert!(python.contains(".accepted_senders.ref.post(request_body)"));
    }

    #[test]
    fn test_should_render_synthesized_action_body_with_wide_integer() {
        let post = json_request(
            Method::POST,
            "/v1.0/teams/7b3d5a4e/sendActivityNotification",
            r#"{"chainId": 10}"#,
        );
        let generator = generator();
        for language in generator.supported_languages() {
            let snippet = generator.snippet_for(&post, language).unwrap();
            assert!(snippet.contains("SendActivityNotificationPostRequestBody"), "{language}:\n{snippet}");
            assert!(!snippet.contains("microsoft.graph"), "{language}:\n{snippet}");
        }
        let csharp = generator.snippet_for(&post, "csharp").unwrap();
        assert!(csharp.contains("\tChainId = 10L,"));
        let go = generator.snippet_for(&post, "go").unwrap();
        assert!(go.contains("chainId := int64(10)"));
    }

    #[test]
    fn test_should_place_binds_in_additional_data() {
        let post = json_request(
            Method::POST,
            "/v1.0/groups",
            r#"{"displayName": "Library", "members@odata.bind": ["https://graph.microsoft.com/v1.0/users/u1"]}"#,
        );
        let csharp = snippet(&post, "csharp").unwrap();
        let display = csharp.find("DisplayName = \"Library\"").unwrap();
        let data = csharp.find("AdditionalData = new Dictionary<string, object>").unwrap();
        assert!(display < data);
        assert!(csharp.contains("\"members@odata.bind\", new List<string>"));
    }

    #[test]
    fn test_should_upload_binary_content_as_stream() {
        let put = request(Method::PUT, "/v1.0/drives/b!t18F/items/01BY/content")
            .with_header("Content-Type", "application/octet-stream")
            .with_body(vec![1_u8, 2]);
        let csharp = snippet(&put, "csharp").unwrap();
        assert!(csharp.contains("using var requestBody = new MemoryStream(Convert.FromBase64String(\"AQI=\"));"));
        assert!(csharp.contains(".Content.PutAsync(requestBody);"));
        assert!(csharp.contains("using System.IO;"));

        let go = snippet(&put, "go").unwrap();
        assert!(go.contains("requestBody, _ := base64.StdEncoding.DecodeString(\"AQI=\")"));
        assert!(go.contains("\"encoding/base64\""));
        assert!(go.contains(".Content().Put(context.Background(), requestBody, nil)"));
    }
}
