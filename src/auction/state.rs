use super::model::{Lot, MediaItem};

/// 룸별 경매 상태 (현재 랏, 현재 미디어)
/// 입찰 이력은 BidLedger 가 관리한다.
#[derive(Debug, Clone, PartialEq)]
pub struct AuctionState {
    lot: Lot,
    media: Option<MediaItem>,
}

impl Default for AuctionState {
    fn default() -> Self {
        Self {
            lot: Lot::default(),
            media: Some(MediaItem::placeholder()),
        }
    }
}

impl AuctionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lot(&self) -> &Lot {
        &self.lot
    }

    pub fn media(&self) -> Option<&MediaItem> {
        self.media.as_ref()
    }

    /// 랏 교체: 현재 미디어는 랏의 첫 번째 미디어 (없으면 비움)
    pub fn set_lot(&mut self, lot: Lot) {
        self.media = lot.media.first().cloned();
        self.lot = lot;
    }

    /// 미디어만 교체 (랏과 무관)
    pub fn set_media(&mut self, media: MediaItem) {
        self.media = Some(media);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::MediaType;

    fn media(id: i64) -> MediaItem {
        MediaItem {
            id,
            kind: MediaType::Image,
            url: format!("/media/{}.jpg", id),
            description: String::new(),
        }
    }

    fn lot(media: Vec<MediaItem>) -> Lot {
        Lot {
            id: "L1".to_string(),
            title: "Truck".to_string(),
            description: String::new(),
            start_price: 100.0,
            increment: 10.0,
            media,
        }
    }

    #[test]
    fn test_defaults() {
        let state = AuctionState::new();
        assert_eq!(state.lot(), &Lot::default());
        assert_eq!(state.media(), Some(&MediaItem::placeholder()));
    }

    #[test]
    fn test_set_lot_uses_first_media() {
        let mut state = AuctionState::new();
        state.set_lot(lot(vec![media(3), media(4)]));
        assert_eq!(state.lot().id, "L1");
        assert_eq!(state.media(), Some(&media(3)));
    }

    #[test]
    fn test_set_lot_without_media_leaves_media_unset() {
        let mut state = AuctionState::new();
        state.set_lot(lot(vec![]));
        assert_eq!(state.media(), None);
    }

    #[test]
    fn test_media_override_and_reset() {
        let mut state = AuctionState::new();
        state.set_lot(lot(vec![media(3)]));
        state.set_media(media(9));
        assert_eq!(state.media(), Some(&media(9)));
        assert_eq!(state.lot().id, "L1");

        state.reset();
        assert_eq!(state, AuctionState::default());
    }
}
