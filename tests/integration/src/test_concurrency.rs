//! Concurrent generation over a shared index cache.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use http::Method;
    use snippetgen_core::SnippetConfig;

    use crate::{counting_generator, request};

    #[test]
    fn test_should_load_index_once_under_concurrent_requests() {
        let loads = Arc::new(AtomicUsize::new(0));
        let generator = Arc::new(counting_generator(SnippetConfig::default(), Arc::clone(&loads)));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let generator = Arc::clone(&generator);
                thread::spawn(move || {
                    let language = generator.supported_languages()[i % 3];
                    generator.snippet_for(&request(Method::GET, "/v1.0/me/messages"), language)
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_should_produce_identical_output_across_threads() {
        let generator = Arc::new(counting_generator(SnippetConfig::default(), Arc::default()));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = Arc::clone(&generator);
                thread::spawn(move || {
                    generator
                        .snippet_for(
                            &request(Method::GET, "/v1.0/me/reminderView(StartDateTime='a',EndDateTime='b')"),
                            "go",
                        )
                        .unwrap()
                })
            })
            .collect();
        let snippets: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(snippets.windows(2).all(|w| w[0] == w[1]));
    }
}
