//! 各種インデックスの定義。
//!
//! 区間列とスクリプトの文列はどちらも配列で持つので、取り違えを防ぐため専用の型を設ける。

macro_rules! define_index {
    ($ty:ident) => {
        #[repr(transparent)]
        #[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
        pub struct $ty(usize);

        impl $ty {
            pub fn new(inner: usize) -> Self {
                Self(inner)
            }

            pub fn get(self) -> usize {
                self.0
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

// 正規形の区間列におけるピースのインデックス。
define_index!(PieceIdx);

// スクリプト内の文のインデックス。
define_index!(StmtIdx);
