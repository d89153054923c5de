use std::collections::HashSet;
use std::rc::{Rc, Weak};

use crate::models::Post;

/// How a batch of posts is merged into the feed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    /// Replace the whole feed (initial load, pull-to-refresh)
    Reload,
    /// Append a page at the tail (infinite scroll)
    LoadMore,
}

/// Receives structural notifications from a [`PostAdapter`]
pub trait PostAdapterDelegate {
    /// The per-post menu was requested for `post` at `index`
    fn show_settings_menu(&self, post: &Post, index: usize);
    /// An update left the feed empty
    fn show_placeholder_for_empty_data_set(&self);
    /// An update changed a non-empty feed
    fn requested_view_update(&self);
}

/// Ordered list of one user's posts.
///
/// `update` notifies the delegate, `remove_post` does not: whoever removes a
/// post is responsible for redrawing.
#[derive(Default)]
pub struct PostAdapter {
    posts: Vec<Post>,
    delegate: Option<Weak<dyn PostAdapterDelegate>>,
}

impl PostAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The adapter keeps only a weak reference; a dropped delegate just stops receiving calls
    pub fn set_delegate(&mut self, delegate: &Rc<dyn PostAdapterDelegate>) {
        self.delegate = Some(Rc::downgrade(delegate));
    }

    fn delegate(&self) -> Option<Rc<dyn PostAdapterDelegate>> {
        self.delegate.as_ref().and_then(Weak::upgrade)
    }

    pub fn update(&mut self, posts: Vec<Post>, mode: UpdateMode) {
        match mode {
            UpdateMode::Reload => {
                self.posts.clear();
                self.append_unique(posts);
            }
            UpdateMode::LoadMore => self.append_unique(posts),
        }

        let Some(delegate) = self.delegate() else {
            return;
        };
        if self.posts.is_empty() {
            delegate.show_placeholder_for_empty_data_set();
        } else {
            delegate.requested_view_update();
        }
    }

    fn append_unique(&mut self, posts: Vec<Post>) {
        let mut seen: HashSet<String> = self.posts.iter().map(|p| p.id.clone()).collect();
        for post in posts {
            if seen.insert(post.id.clone()) {
                self.posts.push(post);
            } else {
                log::debug!("Skipping duplicate post {}", post.id);
            }
        }
    }

    /// Current count; also the offset of the next page
    pub fn post_quantity(&self) -> usize {
        self.posts.len()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post(&self, index: usize) -> Option<&Post> {
        self.posts.get(index)
    }

    /// Remove the post at `index`, keeping the order of the rest.
    ///
    /// # Panics
    /// If `index` is out of range.
    pub fn remove_post(&mut self, index: usize) -> Post {
        assert!(
            index < self.posts.len(),
            "remove_post index {} out of range for {} posts",
            index,
            self.posts.len()
        );
        self.posts.remove(index)
    }

    /// Ask the delegate to show the menu of the post at `index`
    pub fn request_settings_menu(&self, index: usize) {
        let (Some(post), Some(delegate)) = (self.post(index), self.delegate()) else {
            log::debug!("Ignoring settings menu request for index {}", index);
            return;
        };
        delegate.show_settings_menu(post, index);
    }
}
