//! CFGの線形化
//!
//! 2回の走査で命令列を作る。1回目は分岐先と合流先にラベルを付け、
//! 2回目は同じ順序で辿りながら命令を並べる。どちらも訪問済み集合を持つので
//! ループの後退辺で止まり、各命令はちょうど1回だけ現れる。

use std::collections::{HashMap, HashSet};

use crate::error::CodegenError;
use crate::ir::{Function, InstId};

/// 線形化された命令列の要素
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinearItem {
    Label(String),
    Inst(InstId),
    /// 訪問済み命令への無条件ジャンプ
    Jump(String),
    /// return を経ずに経路が終わった（暗黙の関数末尾）
    FallOff,
}

/// 走査中の出来事
#[derive(Debug, Clone, Copy)]
enum Step {
    Visit(InstId),
    Revisit(InstId),
    End(InstId),
}

/// 線形化の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Linearization {
    pub items: Vec<LinearItem>,
    pub labels: HashMap<InstId, String>,
}

impl Linearization {
    pub fn label(&self, id: InstId) -> Option<&str> {
        self.labels.get(&id).map(String::as_str)
    }

    /// 命令（`Inst`）の数
    pub fn instruction_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item, LinearItem::Inst(_)))
            .count()
    }
}

/// ラベル番号は1回のコード生成の中で通し番号になる
#[derive(Debug, Default)]
pub struct Linearizer {
    next_label: usize,
}

impl Linearizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn linearize(&mut self, function: &Function) -> Result<Linearization, CodegenError> {
        let labels = self.assign_labels(function)?;

        let mut items = Vec::new();
        let mut missing = None;
        walk(function, |step| match step {
            Step::Visit(id) => {
                if let Some(label) = labels.get(&id) {
                    items.push(LinearItem::Label(label.clone()));
                }
                items.push(LinearItem::Inst(id));
            }
            Step::Revisit(id) => match labels.get(&id) {
                Some(label) => items.push(LinearItem::Jump(label.clone())),
                None => missing = Some(id),
            },
            Step::End(id) => {
                if !function.get(id).map_or(false, |inst| inst.is_return()) {
                    items.push(LinearItem::FallOff);
                }
            }
        })?;

        if let Some(id) = missing {
            return Err(malformed(function, format!("{} にラベルがありません", id)));
        }
        Ok(Linearization { items, labels })
    }

    /// 1回目の走査：分岐の真側の飛び先と、2回目に到達した命令にラベルを付ける
    fn assign_labels(&mut self, function: &Function) -> Result<HashMap<InstId, String>, CodegenError> {
        let mut targets = Vec::new();
        walk(function, |step| match step {
            Step::Visit(id) => {
                if let Some(inst) = function.get(id) {
                    if inst.is_branch() {
                        targets.extend(inst.next[1]);
                    }
                }
            }
            Step::Revisit(id) => targets.push(id),
            Step::End(_) => {}
        })?;

        let mut labels = HashMap::new();
        for id in targets {
            if !labels.contains_key(&id) {
                let label = format!(".L{}", self.next_label);
                self.next_label += 1;
                log::trace!("{}: {} labeled {}", function.name, id, label);
                labels.insert(id, label);
            }
        }
        Ok(labels)
    }
}

/// 入口から深さ優先で辿る
///
/// 条件分岐では真側を後回しにして偽側（`next[0]`）を続けて辿る。
/// 経路の途中で訪問済みの命令に着いたら `Revisit` を報告してその経路を終える。
fn walk(function: &Function, mut step: impl FnMut(Step)) -> Result<(), CodegenError> {
    let mut visited = HashSet::new();
    let mut deferred = vec![function.start];

    while let Some(first) = deferred.pop() {
        if visited.contains(&first) {
            continue;
        }
        let mut cursor = Some(first);
        while let Some(id) = cursor {
            if !visited.insert(id) {
                step(Step::Revisit(id));
                break;
            }
            let inst = function
                .get(id)
                .ok_or_else(|| malformed(function, format!("{} は存在しません", id)))?;
            step(Step::Visit(id));
            if inst.is_branch() {
                let taken = inst.next[1].ok_or_else(|| {
                    malformed(function, format!("条件分岐 {} に真側の飛び先がありません", id))
                })?;
                deferred.push(taken);
            }
            cursor = inst.next[0];
            if cursor.is_none() {
                step(Step::End(id));
            }
        }
    }
    Ok(())
}

fn malformed(function: &Function, message: String) -> CodegenError {
    CodegenError::MalformedGraph {
        function: function.name.clone(),
        message,
    }
}
