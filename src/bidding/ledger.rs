use super::model::Bid;

/// 룸별 입찰 원장 (추가 전용)
/// 현재 입찰은 항상 마지막으로 추가된 입찰이다. 금액 검증은 하지 않는다.
#[derive(Debug, Default, Clone)]
pub struct BidLedger {
    history: Vec<Bid>,
}

impl BidLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 입찰 추가 (도착 순서 유지, 금액 비교 없음)
    pub fn append(&mut self, bid: Bid) -> &Bid {
        self.history.push(bid);
        &self.history[self.history.len() - 1]
    }

    pub fn history(&self) -> &[Bid] {
        &self.history
    }

    /// 현재 입찰 (없으면 기본값)
    pub fn current(&self) -> Bid {
        self.history.last().cloned().unwrap_or_else(Bid::placeholder)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// 새 랏 또는 경매 중지 시 초기화
    pub fn clear(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bid(username: &str, amount: f64) -> Bid {
        Bid {
            auction_id: "A1".to_string(),
            username: username.to_string(),
            bid_amount: amount,
        }
    }

    #[test]
    fn test_empty_ledger_has_placeholder() {
        let ledger = BidLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.current(), Bid::placeholder());
    }

    #[test]
    fn test_arrival_order_and_current() {
        let mut ledger = BidLedger::new();
        let bids = vec![bid("U1", 100.0), bid("U2", 120.0), bid("U3", 130.0)];
        for b in bids.clone() {
            ledger.append(b);
        }
        assert_eq!(ledger.history(), bids.as_slice());
        assert_eq!(ledger.current(), bids[2]);
    }

    #[test]
    fn test_lower_bid_is_accepted() {
        let mut ledger = BidLedger::new();
        ledger.append(bid("U1", 200.0));
        ledger.append(bid("U2", 50.0));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.current().bid_amount, 50.0);
    }

    #[test]
    fn test_clear() {
        let mut ledger = BidLedger::new();
        ledger.append(bid("U1", 10.0));
        ledger.clear();
        assert!(ledger.is_empty());
        assert_eq!(ledger.current(), Bid::placeholder());
    }
}
