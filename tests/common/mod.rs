//! Shared test fixtures.

#![allow(dead_code)]

use std::borrow::Cow;

use dongne_search::{SearchField, Searchable};

// Re-export canonical test utilities from dongne_search::testing
pub use dongne_search::testing::{make_full_post, make_post, SamplePost};

/// A post the way a host application actually stores one, implemented
/// against [`Searchable`] from outside the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityPost {
    pub id: u32,
    pub title: String,
    pub content: String,
    pub author: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

impl Searchable for CommunityPost {
    fn field_text(&self, field: SearchField) -> Option<Cow<'_, str>> {
        match field {
            SearchField::Title => Some(Cow::Borrowed(self.title.as_str())),
            SearchField::Content => Some(Cow::Borrowed(self.content.as_str())),
            SearchField::AuthorName => Some(Cow::Borrowed(self.author.as_str())),
        }
    }

    fn sort_key(&self) -> Option<i64> {
        Some(self.created_at)
    }
}

pub fn post(id: u32, title: &str, content: &str, author: &str, created_at: i64) -> CommunityPost {
    CommunityPost {
        id,
        title: title.to_string(),
        content: content.to_string(),
        author: author.to_string(),
        created_at,
    }
}

/// A small neighborhood-board corpus with known term overlaps:
/// two posts mention 테니스, two are by 김민수, one carries 광고,
/// and the titles cover 모임/모집 variants.
pub fn community_corpus() -> Vec<CommunityPost> {
    vec![
        post(
            1,
            "테니스 모임 공지",
            "이번 주 토요일 아침 7시에 만나요",
            "김민수",
            1_700_000_300_000,
        ),
        post(
            2,
            "배드민턴 같이 치실 분",
            "셔틀콕은 제가 준비합니다",
            "이영희",
            1_700_000_200_000,
        ),
        post(
            3,
            "동네 맛집 추천 받아요",
            "김치찌개 잘하는 집 아시나요",
            "박철수",
            1_700_000_100_000,
        ),
        post(
            4,
            "중고 테니스 라켓 팝니다",
            "광고 아닙니다 직거래만 해요",
            "김민수",
            1_700_000_400_000,
        ),
        post(
            5,
            "영어 스터디 모집",
            "주 2회 온라인으로 진행해요",
            "최지은",
            1_700_000_500_000,
        ),
    ]
}
